//! Unary operator evaluation

use super::integer_operand;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation, UnOp};

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let value = self.evaluate_expr(operand, env)?;
        apply_unary_op(op, &value, location)
    }
}

pub(crate) fn apply_unary_op(
    op: UnOp,
    value: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let n = integer_operand(value, location)?;
    let result = match op {
        UnOp::Neg => n.wrapping_neg(),
        UnOp::Not => i32::from(n == 0),
    };
    Ok(Value::Int(result))
}
