//! Evaluator for the C subset
//!
//! This module provides the execution side of the crate:
//! - [`program`]: Builds a [`program::Program`] (struct layouts and function
//!   signatures) from a parsed translation unit
//! - [`engine`]: The [`engine::Interpreter`] driver that runs `main`
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Source-level calls are host-level
//! calls: every activation is a Rust stack frame that owns its own
//! [`crate::memory::environment::Environment`]. The host stack grows on
//! demand, and a configurable depth limit turns runaway recursion into a
//! [`errors::RuntimeError::CallDepthExceeded`] instead of a crash.
//!
//! Interpreter methods are split across multiple files using
//! `impl Interpreter` blocks: calls, statements, expressions and operators.

mod calls;
pub mod engine;
pub mod errors;
mod expressions;
pub mod ops;
pub mod program;
mod statements;
