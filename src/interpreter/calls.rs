//! Call engine
//!
//! Each call runs in a fresh [`Environment`] owned by this stack frame of
//! the host, so nested activations of the same function never share locals.
//! Arguments arrive fully evaluated; they are converted to the parameter
//! types before anything is bound, so a bad argument leaves no partial
//! environment behind.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::statements::ControlFlow;
use crate::memory::environment::Environment;
use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;
use tracing::trace;

/// Grow the stack when less than this remains
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

impl Interpreter {
    /// Invoke a function by name with already-evaluated arguments
    pub(crate) fn call_function(
        &self,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let function =
            self.program
                .function(name)
                .ok_or_else(|| RuntimeError::UndefinedFunction {
                    name: name.to_string(),
                    location,
                })?;

        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                function: name.to_string(),
                expected: function.params.len(),
                got: args.len(),
                location,
            });
        }

        let args = args
            .into_iter()
            .zip(&function.params)
            .map(|(value, (_, ty))| {
                value.coerce_to(ty).map_err(|e| e.at(location))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let depth = self.call_depth.get();
        if depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                function: name.to_string(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        let mut env = Environment::new(name);
        for ((param, ty), value) in function.params.iter().zip(args) {
            if !env.declare(param, ty.clone(), value) {
                return Err(RuntimeError::DuplicateVariable {
                    name: param.clone(),
                    location: function.location,
                });
            }
        }

        self.call_depth.set(depth + 1);
        trace!(function = name, depth = depth + 1, "enter");
        let outcome = ensure_sufficient_stack(|| {
            self.execute_block(&function.body, &mut env)
        });
        self.call_depth.set(depth);
        trace!(function = name, depth = depth + 1, "exit");

        match (outcome?, &function.return_type) {
            (
                ControlFlow::Return {
                    value: Some(value),
                    location,
                },
                Some(ty),
            ) => value.coerce_to(ty).map_err(|e| e.at(location)),
            (
                ControlFlow::Return { value: None, .. } | ControlFlow::Normal,
                None,
            ) => Ok(Value::Void),
            // Includes `return g();` where `g` is itself void
            (ControlFlow::Return { value: Some(_), location }, None) => {
                Err(RuntimeError::UnsupportedOperation {
                    message: format!(
                        "cannot return a value from void function '{}'",
                        name
                    ),
                    location,
                })
            }
            (ControlFlow::Return { value: None, location }, Some(ty)) => {
                Err(RuntimeError::TypeMismatch {
                    expected: ty.to_string(),
                    got: "void".to_string(),
                    location,
                })
            }
            (ControlFlow::Normal, Some(_)) => Err(RuntimeError::MissingReturn {
                function: name.to_string(),
                location: function.location,
            }),
        }
    }
}
