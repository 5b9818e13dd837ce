//! Operator evaluation
//!
//! - [`binary`]: arithmetic, comparison and short-circuit logical operators
//! - [`unary`]: negation and logical not
//!
//! Operands of type `char` are promoted to `int` first; every operator yields
//! an `int`.

pub mod binary;
pub mod unary;

use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;

/// Promote a scalar operand to `int`
pub(crate) fn integer_operand(
    value: &Value,
    location: SourceLocation,
) -> Result<i32, RuntimeError> {
    value.as_integer().ok_or_else(|| RuntimeError::TypeMismatch {
        expected: "int or char".to_string(),
        got: value.type_name(),
        location,
    })
}

/// Condition semantics: non-zero scalars are true
pub(crate) fn truth_value(
    value: &Value,
    location: SourceLocation,
) -> Result<bool, RuntimeError> {
    integer_operand(value, location).map(|n| n != 0)
}
