//! C source code parser
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split into declaration, statement
//!   and expression submodules
//! - [`ast`]: AST node definitions
//!
//! # Supported C Subset
//!
//! - Types: `int`, `char`, `void` (return type only), structs nesting structs
//! - Declarations: struct definitions and forward declarations, function
//!   definitions and prototypes
//! - Statements: declarations, assignments, `if`/`else`, `while`, `return`,
//!   blocks
//! - Expressions: arithmetic, comparison, logical, calls, member access,
//!   compound literals with designated initializers, `sizeof(type)`
//! - No preprocessor (directives are skipped), pointers, arrays, unions,
//!   floating point, typedefs or globals
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
