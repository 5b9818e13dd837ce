//! Program driver
//!
//! [`Interpreter`] owns a built [`Program`] and runs it from `main`. The call
//! engine, statement executor and expression evaluator extend it through
//! `impl Interpreter` blocks in sibling modules.

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::program::Program;
use std::cell::Cell;
use tracing::debug;

/// Default recursion limit
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Interpreter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of simultaneously active calls, `main` included
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Tree-walking interpreter for a built program
pub struct Interpreter {
    pub(crate) program: Program,
    pub(crate) config: InterpreterConfig,
    /// Number of active calls
    pub(crate) call_depth: Cell<usize>,
}

impl Interpreter {
    pub fn new(program: Program, config: InterpreterConfig) -> Self {
        Interpreter {
            program,
            config,
            call_depth: Cell::new(0),
        }
    }

    /// Call `main` with no arguments and return its integer result
    pub fn run(&self) -> Result<i32, RuntimeError> {
        let main = self
            .program
            .function("main")
            .ok_or(RuntimeError::NoEntryPoint)?;
        let location = main.location;

        debug!(max_call_depth = self.config.max_call_depth, "running main");
        let result = self.call_function("main", Vec::new(), location)?;

        let code = result
            .as_integer()
            .ok_or_else(|| RuntimeError::TypeMismatch {
                expected: "int".to_string(),
                got: result.type_name(),
                location,
            })?;
        debug!(result = code, "main returned");
        Ok(code)
    }
}
