//! Memory model for the evaluator
//!
//! This module provides the core data abstractions:
//! - [`registry`]: Struct layouts and the per-program
//!   [`registry::TypeRegistry`]
//! - [`value`]: Runtime value representation (Int, Char, Struct)
//! - [`environment`]: One call activation's local bindings
//!
//! # Type Sizes
//!
//! Unlike real C, the evaluator uses fixed, platform-independent sizes:
//! - `int`: 4 bytes
//! - `char`: 1 byte
//! - `struct`: sum of field sizes in declaration order (no padding)
//!
//! Errors raised here carry no source location; the interpreter attaches one
//! with [`MemoryError::at`].

pub mod environment;
pub mod registry;
pub mod value;

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use std::fmt;

/// Size of `int` in bytes
pub const INT_SIZE: usize = 4;

/// Size of `char` in bytes
pub const CHAR_SIZE: usize = 1;

/// Errors from the type registry and the value model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    DuplicateType {
        name: String,
    },
    UnknownType {
        name: String,
    },
    UnknownFieldType {
        struct_name: String,
        field: String,
        type_name: String,
    },
    DuplicateField {
        struct_name: String,
        field: String,
    },
    UnknownField {
        struct_name: String,
        field: String,
    },
    /// Field access on a scalar
    NotAStruct {
        field: String,
        found: String,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
}

impl MemoryError {
    /// Attach a source location, producing the interpreter-level error
    pub fn at(self, location: SourceLocation) -> RuntimeError {
        match self {
            MemoryError::DuplicateType { name } => {
                RuntimeError::DuplicateType { name, location }
            }
            MemoryError::UnknownType { name } => {
                RuntimeError::UnknownType { name, location }
            }
            MemoryError::UnknownFieldType {
                struct_name,
                field,
                type_name,
            } => RuntimeError::UnknownFieldType {
                struct_name,
                field,
                type_name,
                location,
            },
            MemoryError::DuplicateField { struct_name, field } => {
                RuntimeError::DuplicateField {
                    struct_name,
                    field,
                    location,
                }
            }
            MemoryError::UnknownField { struct_name, field } => {
                RuntimeError::UnknownField {
                    struct_name,
                    field,
                    location,
                }
            }
            MemoryError::NotAStruct { field, found } => {
                RuntimeError::NotAStruct {
                    field,
                    found,
                    location,
                }
            }
            MemoryError::TypeMismatch { expected, got } => {
                RuntimeError::TypeMismatch {
                    expected,
                    got,
                    location,
                }
            }
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::DuplicateType { name } => {
                write!(f, "struct '{}' is already defined", name)
            }
            MemoryError::UnknownType { name } => {
                write!(f, "unknown type '{}'", name)
            }
            MemoryError::UnknownFieldType {
                struct_name,
                field,
                type_name,
            } => write!(
                f,
                "field '{}' of struct '{}' has unknown type '{}'",
                field, struct_name, type_name
            ),
            MemoryError::DuplicateField { struct_name, field } => {
                write!(
                    f,
                    "struct '{}' declares field '{}' twice",
                    struct_name, field
                )
            }
            MemoryError::UnknownField { struct_name, field } => {
                write!(f, "struct '{}' has no field '{}'", struct_name, field)
            }
            MemoryError::NotAStruct { field, found } => {
                write!(
                    f,
                    "cannot access field '{}' of non-struct value {}",
                    field, found
                )
            }
            MemoryError::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for MemoryError {}
