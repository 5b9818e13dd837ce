//! # Introduction
//!
//! `ceval` parses and evaluates a small subset of C: `int`, `char` and
//! `void` functions, structs nesting other structs, compound literals with
//! designated initializers, integer arithmetic, recursion and structured
//! control flow. A program's result is the integer returned by `main`.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST
//!        → Program (layouts, signatures) → Interpreter → i32
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`memory`]: struct layouts, tagged runtime values and per-call
//!    environments.
//! 3. [`interpreter`]: builds the [`interpreter::program::Program`] and walks
//!    the AST from `main`.
//!
//! ## Example
//!
//! ```
//! use ceval::{run_source, InterpreterConfig};
//!
//! let source = r#"
//!     struct Point { int x; int y; };
//!     int main() {
//!         struct Point p = (struct Point){ .y = 2 };
//!         return p.x + p.y;
//!     }
//! "#;
//! assert_eq!(run_source(source, InterpreterConfig::default()).unwrap(), 2);
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;

pub use interpreter::engine::{
    Interpreter, InterpreterConfig, DEFAULT_MAX_CALL_DEPTH,
};
pub use interpreter::errors::RuntimeError;
pub use interpreter::program::Program;
pub use parser::parse::ParseError;

use parser::ast::{SourceLocation, TranslationUnit};
use parser::parse::Parser;
use std::fmt;

/// Any error from parsing or running a program
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl Error {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Parse(e) => Some(e.location),
            Error::Runtime(e) => e.location().copied(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Runtime(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime(err)
    }
}

/// Parse source text into a translation unit
pub fn parse_source(source: &str) -> Result<TranslationUnit, ParseError> {
    Parser::new(source)?.parse_program()
}

/// Parse, build and run a program, returning `main`'s result
pub fn run_source(
    source: &str,
    config: InterpreterConfig,
) -> Result<i32, Error> {
    let unit = parse_source(source)?;
    let program = Program::from_ast(&unit)?;
    let interpreter = Interpreter::new(program, config);
    Ok(interpreter.run()?)
}
