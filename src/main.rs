// ceval: run a C-subset program and exit with main's result

use ceval::parser::ast::SourceLocation;
use ceval::{
    parse_source, Error, Interpreter, InterpreterConfig, Program,
    DEFAULT_MAX_CALL_DEPTH,
};
use clap::{ArgAction, Parser};
use crossterm::style::Stylize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ceval", version, about = "Evaluate a small C subset")]
struct CliArgs {
    /// C source file to run
    file: PathBuf,

    /// Maximum number of nested calls before execution is aborted
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Print the parsed AST instead of running the program
    #[arg(long)]
    dump_ast: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("ceval={}", level))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Print an error with the offending source line underneath
fn report(err: &Error, path: &str, source: &str) {
    eprintln!("{} {}", "error:".red().bold(), err);

    let Some(SourceLocation { line, column }) = err.location() else {
        return;
    };
    let Some(text) =
        line.checked_sub(1).and_then(|i| source.lines().nth(i))
    else {
        return;
    };

    let gutter = line.to_string();
    eprintln!(
        "{}{} {}:{}:{}",
        " ".repeat(gutter.len()),
        "-->".blue().bold(),
        path,
        line,
        column
    );
    eprintln!(
        "{} {} {}",
        gutter.as_str().blue().bold(),
        "|".blue().bold(),
        text
    );
    eprintln!(
        "{} {} {}{}",
        " ".repeat(gutter.len()),
        "|".blue().bold(),
        " ".repeat(column.saturating_sub(1)),
        "^".red().bold()
    );
}

fn run(args: &CliArgs, source: &str) -> Result<Option<i32>, Error> {
    let unit = parse_source(source)?;
    debug!(items = unit.items.len(), "parsed");

    if args.dump_ast {
        println!("{:#?}", unit);
        return Ok(None);
    }

    let program = Program::from_ast(&unit)?;
    let interpreter = Interpreter::new(
        program,
        InterpreterConfig {
            max_call_depth: args.max_call_depth,
        },
    );
    Ok(Some(interpreter.run()?))
}

fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let path = args.file.display().to_string();
    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "{} cannot read '{}': {}",
                "error:".red().bold(),
                path,
                e
            );
            std::process::exit(1);
        }
    };

    debug!(file = %path, "starting");
    match run(&args, &source) {
        Ok(Some(code)) => {
            println!("{}", code);
            std::process::exit(code);
        }
        Ok(None) => {}
        Err(err) => {
            report(&err, &path, &source);
            std::process::exit(1);
        }
    }
}
