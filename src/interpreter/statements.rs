//! Statement execution
//!
//! Statements run against the caller-owned [`Environment`] and report whether
//! control falls through or a `return` was hit. A `return` anywhere inside
//! nested blocks or loops unwinds straight to the call engine.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::truth_value;
use crate::memory::environment::Environment;
use crate::memory::value::{set_field, zero_value, Value};
use crate::parser::ast::{Expr, SourceLocation, Stmt, Type};

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    Normal,
    Return {
        value: Option<Value>,
        location: SourceLocation,
    },
}

impl Interpreter {
    /// Execute statements in a new block scope
    pub(crate) fn execute_block(
        &self,
        statements: &[Stmt],
        env: &mut Environment,
    ) -> Result<ControlFlow, RuntimeError> {
        env.push_scope();
        let result = self.execute_statements(statements, env);
        env.pop_scope();
        result
    }

    fn execute_statements(
        &self,
        statements: &[Stmt],
        env: &mut Environment,
    ) -> Result<ControlFlow, RuntimeError> {
        for stmt in statements {
            let flow = self.execute_statement(stmt, env)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_statement(
        &self,
        stmt: &Stmt,
        env: &mut Environment,
    ) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::VarDecl {
                name,
                var_type,
                init,
                location,
            } => {
                self.execute_var_decl(
                    name,
                    var_type,
                    init.as_ref(),
                    *location,
                    env,
                )?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Assignment {
                target,
                value,
                location,
            } => {
                self.execute_assignment(target, value, *location, env)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Return { expr, location } => {
                let value = match expr {
                    Some(e) => Some(self.evaluate_expr(e, env)?),
                    None => None,
                };
                Ok(ControlFlow::Return {
                    value,
                    location: *location,
                })
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.evaluate_expr(condition, env)?;
                if truth_value(&cond, condition.location())? {
                    self.execute_block(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch, env)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::While {
                condition, body, ..
            } => {
                loop {
                    let cond = self.evaluate_expr(condition, env)?;
                    if !truth_value(&cond, condition.location())? {
                        break;
                    }
                    let flow = self.execute_block(body, env)?;
                    if flow != ControlFlow::Normal {
                        return Ok(flow);
                    }
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::Block { statements, .. } => {
                self.execute_block(statements, env)
            }

            Stmt::Expression { expr, .. } => {
                self.evaluate_expr(expr, env)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    fn execute_var_decl(
        &self,
        name: &str,
        var_type: &Type,
        init: Option<&Expr>,
        location: SourceLocation,
        env: &mut Environment,
    ) -> Result<(), RuntimeError> {
        let ty = self
            .program
            .types()
            .resolve_type(var_type)
            .map_err(|e| e.at(location))?
            .ok_or_else(|| RuntimeError::UnsupportedOperation {
                message: format!("variable '{}' cannot have type void", name),
                location,
            })?;

        if env.is_declared(name) {
            return Err(RuntimeError::DuplicateVariable {
                name: name.to_string(),
                location,
            });
        }

        let value = match init {
            Some(expr) => self.evaluate_initializer(expr, &ty, env)?,
            None => zero_value(&ty),
        };

        env.declare(name, ty, value);
        Ok(())
    }

    /// `x = v` or `x.a.b = v`
    fn execute_assignment(
        &self,
        target: &Expr,
        value: &Expr,
        location: SourceLocation,
        env: &mut Environment,
    ) -> Result<(), RuntimeError> {
        let (root, path) = target.member_path();
        let Expr::Variable(name, var_location) = root else {
            return Err(RuntimeError::InvalidAssignmentTarget { location });
        };

        let var_ty = env
            .get(name)
            .map(|var| var.ty.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.clone(),
                location: *var_location,
            })?;

        let slot_ty = if path.is_empty() {
            var_ty
        } else {
            let layout =
                var_ty.layout().ok_or_else(|| RuntimeError::NotAStruct {
                    field: path[0].to_string(),
                    found: var_ty.to_string(),
                    location: target.location(),
                })?;
            let (_, ty) = layout
                .offset_of(&path)
                .map_err(|e| e.at(target.location()))?;
            ty
        };

        let new_value = self.evaluate_initializer(value, &slot_ty, env)?;

        let var = env
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.clone(),
                location: *var_location,
            })?;
        if path.is_empty() {
            var.value = new_value;
        } else {
            set_field(&mut var.value, &path, new_value)
                .map_err(|e| e.at(location))?;
        }
        Ok(())
    }
}
