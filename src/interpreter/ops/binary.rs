//! Binary operator evaluation
//!
//! Arithmetic wraps on overflow (two's complement, 32 bits). `&&` and `||`
//! evaluate their right operand only when the left one does not decide the
//! result.

use super::{integer_operand, truth_value};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, Expr, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        if matches!(op, BinOp::And | BinOp::Or) {
            return self.evaluate_logical_op(op, left, right, env);
        }

        let lhs = self.evaluate_expr(left, env)?;
        let rhs = self.evaluate_expr(right, env)?;
        apply_binary_op(op, &lhs, &rhs, location)
    }

    fn evaluate_logical_op(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let lhs =
            truth_value(&self.evaluate_expr(left, env)?, left.location())?;

        let decided = match op {
            BinOp::And => !lhs,
            _ => lhs,
        };
        if decided {
            return Ok(Value::Int(i32::from(lhs)));
        }

        let rhs =
            truth_value(&self.evaluate_expr(right, env)?, right.location())?;
        Ok(Value::Int(i32::from(rhs)))
    }
}

/// Apply an operator to two evaluated operands
pub(crate) fn apply_binary_op(
    op: BinOp,
    lhs: &Value,
    rhs: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let a = integer_operand(lhs, location)?;
    let b = integer_operand(rhs, location)?;

    let result = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero {
                    operation: "Division".to_string(),
                    location,
                });
            }
            a.wrapping_div(b)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero {
                    operation: "Modulo".to_string(),
                    location,
                });
            }
            a.wrapping_rem(b)
        }
        BinOp::Eq => i32::from(a == b),
        BinOp::Ne => i32::from(a != b),
        BinOp::Lt => i32::from(a < b),
        BinOp::Le => i32::from(a <= b),
        BinOp::Gt => i32::from(a > b),
        BinOp::Ge => i32::from(a >= b),
        BinOp::And => i32::from(a != 0 && b != 0),
        BinOp::Or => i32::from(a != 0 || b != 0),
    };

    Ok(Value::Int(result))
}
