//! # Nitro VM
//!
//! Stack-machine interpreter for compiled Nitro templates.
//!
//! ## Design Principles
//!
//! - **Streaming**: Output goes straight to the caller's sink, no intermediate tree
//! - **Shared tables**: A loaded template is read-only and shared across threads
//! - **Request-local state**: Call stack, frames and cancellation live in a
//!   per-render [`RenderContext`]
//! - **Recoverable errors**: Bad operands, stack underflow, runaway nesting and
//!   cancellation are [`RenderError`] values, never panics

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod context;
pub mod error;
pub mod interpreter;
pub mod runtime;

pub use context::{DEFAULT_MAX_DEPTH, Frame, RenderContext};
pub use error::{RenderError, RenderResult};
pub use interpreter::Interpreter;
pub use runtime::{RenderConfig, Renderer};
