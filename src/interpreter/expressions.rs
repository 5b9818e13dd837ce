//! Expression evaluation
//!
//! Expressions never mutate the environment; only statements do. Function
//! call arguments are evaluated left to right in the caller's environment
//! before the call engine takes over.
//!
//! Struct literals are typed by their own name (`(struct A){ ... }`) or, for a
//! bare `{ ... }`, by the declaration, field or assignment target they
//! initialize.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::memory::registry::TypeDescriptor;
use crate::memory::value::{build_composite, get_field, Value};
use crate::parser::ast::{Expr, Initializer, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_expr(
        &self,
        expr: &Expr,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::CharLiteral(c, _) => Ok(Value::Char(*c)),

            Expr::Variable(name, location) => env
                .get(name)
                .map(|var| var.value.clone())
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: name.clone(),
                    location: *location,
                }),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => self.evaluate_binary_op(*op, left, right, *location, env),

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary_op(*op, operand, *location, env),

            Expr::FunctionCall {
                name,
                args,
                location,
            } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_expr(arg, env)?);
                }
                self.call_function(name, values, *location)
            }

            Expr::MemberAccess { location, .. } => {
                let (root, path) = expr.member_path();
                // Read variables in place instead of copying the whole struct
                if let Expr::Variable(name, var_location) = root {
                    let var = env.get(name).ok_or_else(|| {
                        RuntimeError::UndefinedVariable {
                            name: name.clone(),
                            location: *var_location,
                        }
                    })?;
                    return get_field(&var.value, &path)
                        .cloned()
                        .map_err(|e| e.at(*location));
                }
                let base = self.evaluate_expr(root, env)?;
                get_field(&base, &path)
                    .cloned()
                    .map_err(|e| e.at(*location))
            }

            Expr::CompoundLiteral {
                struct_name,
                initializers,
                location,
            } => {
                let ty = self
                    .program
                    .types()
                    .resolve(struct_name)
                    .map_err(|e| e.at(*location))?;
                self.build_struct_literal(&ty, initializers, *location, env)
            }

            Expr::InitList { location, .. } => {
                Err(RuntimeError::UnsupportedOperation {
                    message: "a braced initializer list needs a known target \
                              type"
                        .to_string(),
                    location: *location,
                })
            }

            Expr::SizeofType {
                target_type,
                location,
            } => {
                let ty = self
                    .program
                    .types()
                    .resolve_type(target_type)
                    .map_err(|e| e.at(*location))?
                    .ok_or_else(|| RuntimeError::UnsupportedOperation {
                        message: "sizeof(void)".to_string(),
                        location: *location,
                    })?;
                Ok(Value::Int(ty.size() as i32))
            }
        }
    }

    /// Evaluate a value that is about to be bound to a slot of type `ty`
    ///
    /// Bare initializer lists take their struct type from `ty`; every other
    /// expression is converted with [`Value::coerce_to`].
    pub(crate) fn evaluate_initializer(
        &self,
        expr: &Expr,
        ty: &TypeDescriptor,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::InitList {
                initializers,
                location,
            } => {
                if ty.is_scalar() {
                    return Err(RuntimeError::TypeMismatch {
                        expected: ty.to_string(),
                        got: "initializer list".to_string(),
                        location: *location,
                    });
                }
                self.build_struct_literal(ty, initializers, *location, env)
            }
            _ => {
                let value = self.evaluate_expr(expr, env)?;
                value.coerce_to(ty).map_err(|e| e.at(expr.location()))
            }
        }
    }

    /// Build a struct value from designated and positional initializers
    ///
    /// A positional entry fills the field after the previous entry's field,
    /// the first field if there was none.
    fn build_struct_literal(
        &self,
        ty: &TypeDescriptor,
        initializers: &[Initializer],
        location: SourceLocation,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let layout = ty.layout().ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "struct".to_string(),
            got: ty.to_string(),
            location,
        })?;

        let mut supplied: Vec<(String, Value)> =
            Vec::with_capacity(initializers.len());
        let mut next_index = 0;

        for init in initializers {
            let index = match &init.designator {
                Some(field) => {
                    layout
                        .field_index(field)
                        .ok_or_else(|| RuntimeError::UnknownField {
                            struct_name: layout.name.clone(),
                            field: field.clone(),
                            location: init.location,
                        })?
                }
                None => next_index,
            };
            let field = layout
                .fields
                .get(index)
                .ok_or_else(|| RuntimeError::TooManyInitializers {
                    struct_name: layout.name.clone(),
                    location: init.location,
                })?;

            let value = self.evaluate_initializer(&init.value, &field.ty, env)?;
            supplied.push((field.name.clone(), value));
            next_index = index + 1;
        }

        build_composite(ty, supplied).map_err(|e| e.at(location))
    }
}
