//! Runtime error types for the evaluator
//!
//! This module defines [`RuntimeError`], which represents every error that
//! can occur while building or executing a program (as opposed to parse
//! errors).
//!
//! All runtime errors are fatal: the first one detected propagates to the
//! driver unchanged and execution stops.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Errors raised while building or running a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A struct name defined twice in one program
    DuplicateType {
        name: String,
        location: SourceLocation,
    },

    /// Reference to a struct that is not (yet) defined
    UnknownType {
        name: String,
        location: SourceLocation,
    },

    /// Struct field whose type is not a scalar or an earlier struct
    UnknownFieldType {
        struct_name: String,
        field: String,
        type_name: String,
        location: SourceLocation,
    },

    DuplicateField {
        struct_name: String,
        field: String,
        location: SourceLocation,
    },

    /// Field name not part of the struct's layout
    UnknownField {
        struct_name: String,
        field: String,
        location: SourceLocation,
    },

    /// Field access on a scalar value
    NotAStruct {
        field: String,
        found: String,
        location: SourceLocation,
    },

    TypeMismatch {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Declaration of a name that is already visible in the current call
    DuplicateVariable {
        name: String,
        location: SourceLocation,
    },

    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    DuplicateFunction {
        name: String,
        location: SourceLocation,
    },

    /// Prototype and definition disagree on parameter or return types
    SignatureMismatch {
        name: String,
        declared_at: SourceLocation,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Non-void function ran off the end of its body
    MissingReturn {
        function: String,
        location: SourceLocation,
    },

    /// No `main` function
    NoEntryPoint,

    /// Division or modulo by zero
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Positional initializers past the last field
    TooManyInitializers {
        struct_name: String,
        location: SourceLocation,
    },

    /// Left side of `=` is not a variable or a field of one
    InvalidAssignmentTarget { location: SourceLocation },

    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },

    /// Recursion deeper than the configured limit
    CallDepthExceeded {
        function: String,
        limit: usize,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::DuplicateType { location, .. }
            | RuntimeError::UnknownType { location, .. }
            | RuntimeError::UnknownFieldType { location, .. }
            | RuntimeError::DuplicateField { location, .. }
            | RuntimeError::UnknownField { location, .. }
            | RuntimeError::NotAStruct { location, .. }
            | RuntimeError::TypeMismatch { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::DuplicateVariable { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::DuplicateFunction { location, .. }
            | RuntimeError::SignatureMismatch { location, .. }
            | RuntimeError::ArityMismatch { location, .. }
            | RuntimeError::MissingReturn { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::TooManyInitializers { location, .. }
            | RuntimeError::InvalidAssignmentTarget { location }
            | RuntimeError::UnsupportedOperation { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. } => {
                Some(location)
            }
            RuntimeError::NoEntryPoint => None,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::DuplicateType { name, location } => {
                write!(
                    f,
                    "Struct '{}' is already defined (line {})",
                    name, location.line
                )
            }
            RuntimeError::UnknownType { name, location } => {
                write!(
                    f,
                    "Unknown type 'struct {}' at line {}",
                    name, location.line
                )
            }
            RuntimeError::UnknownFieldType {
                struct_name,
                field,
                type_name,
                location,
            } => {
                write!(
                    f,
                    "Field '{}' of struct '{}' has unknown type '{}' \
                     at line {}",
                    field, struct_name, type_name, location.line
                )
            }
            RuntimeError::DuplicateField {
                struct_name,
                field,
                location,
            } => {
                write!(
                    f,
                    "Struct '{}' declares field '{}' twice at line {}",
                    struct_name, field, location.line
                )
            }
            RuntimeError::UnknownField {
                struct_name,
                field,
                location,
            } => {
                write!(
                    f,
                    "Struct '{}' does not have field '{}' at line {}",
                    struct_name, field, location.line
                )
            }
            RuntimeError::NotAStruct {
                field,
                found,
                location,
            } => {
                write!(
                    f,
                    "Cannot access field '{}' of non-struct value of type {} \
                     at line {}",
                    field, found, location.line
                )
            }
            RuntimeError::TypeMismatch {
                expected,
                got,
                location,
            } => {
                write!(
                    f,
                    "Type mismatch at line {}: expected {}, got {}",
                    location.line, expected, got
                )
            }
            RuntimeError::UndefinedVariable { name, location } => {
                write!(
                    f,
                    "Undefined variable '{}' at line {}",
                    name, location.line
                )
            }
            RuntimeError::DuplicateVariable { name, location } => {
                write!(
                    f,
                    "Variable '{}' is already declared at line {}",
                    name, location.line
                )
            }
            RuntimeError::UndefinedFunction { name, location } => {
                write!(
                    f,
                    "Undefined function '{}' at line {}",
                    name, location.line
                )
            }
            RuntimeError::DuplicateFunction { name, location } => {
                write!(
                    f,
                    "Function '{}' is already defined (line {})",
                    name, location.line
                )
            }
            RuntimeError::SignatureMismatch {
                name,
                declared_at,
                location,
            } => {
                write!(
                    f,
                    "Definition of '{}' does not match its declaration at \
                     line {} (line {})",
                    name, declared_at.line, location.line
                )
            }
            RuntimeError::ArityMismatch {
                function,
                expected,
                got,
                location,
            } => {
                write!(
                    f,
                    "Function '{}' expects {} argument{}, got {} at line {}",
                    function,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    got,
                    location.line
                )
            }
            RuntimeError::MissingReturn { function, location } => {
                write!(
                    f,
                    "Function '{}' reached the end of its body without \
                     returning a value (defined at line {})",
                    function, location.line
                )
            }
            RuntimeError::NoEntryPoint => {
                write!(f, "No main() function found")
            }
            RuntimeError::DivisionByZero {
                operation,
                location,
            } => {
                write!(f, "{} by zero at line {}", operation, location.line)
            }
            RuntimeError::TooManyInitializers {
                struct_name,
                location,
            } => {
                write!(
                    f,
                    "Too many initializers for 'struct {}' at line {}",
                    struct_name, location.line
                )
            }
            RuntimeError::InvalidAssignmentTarget { location } => {
                write!(
                    f,
                    "Left side of assignment must be a variable or a field \
                     of one at line {}",
                    location.line
                )
            }
            RuntimeError::UnsupportedOperation { message, location } => {
                write!(
                    f,
                    "Unsupported operation: {} at line {}",
                    message, location.line
                )
            }
            RuntimeError::CallDepthExceeded {
                function,
                limit,
                location,
            } => {
                write!(
                    f,
                    "Call depth limit of {} exceeded calling '{}' at line {}",
                    limit, function, location.line
                )
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let err = RuntimeError::ArityMismatch {
            function: "f".into(),
            expected: 1,
            got: 2,
            location: SourceLocation::new(7, 3),
        };
        assert_eq!(
            err.to_string(),
            "Function 'f' expects 1 argument, got 2 at line 7"
        );
    }

    #[test]
    fn test_location_accessor() {
        let loc = SourceLocation::new(2, 5);
        assert_eq!(
            RuntimeError::InvalidAssignmentTarget { location: loc }.location(),
            Some(&loc)
        );
        assert_eq!(RuntimeError::NoEntryPoint.location(), None);
    }

    #[test]
    fn test_signature_mismatch_names_both_lines() {
        let err = RuntimeError::SignatureMismatch {
            name: "f".into(),
            declared_at: SourceLocation::new(1, 1),
            location: SourceLocation::new(4, 1),
        };
        assert_eq!(err.location(), Some(&SourceLocation::new(4, 1)));
        assert_eq!(
            err.to_string(),
            "Definition of 'f' does not match its declaration at line 1 \
             (line 4)"
        );
    }
}
