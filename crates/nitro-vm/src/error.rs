//! Render error types

use nitro_bytecode::ComponentId;
use thiserror::Error;

/// Render errors.
///
/// All of these are scoped to one render. Bytes written to the sink before
/// the error are not retracted.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `ExecComponent` with nothing on the call stack
    #[error("Call stack underflow in component {component}")]
    StackUnderflow {
        /// Component executing the `ExecComponent`
        component: ComponentId,
    },

    /// `CopySnippet` operand past the end of the snippet table
    #[error("Snippet index {index} out of range ({len} snippets)")]
    SnippetOutOfRange {
        /// Offending operand
        index: u32,
        /// Snippet table length
        len: usize,
    },

    /// `CopyData` operand past the end of the data slice
    #[error("Data index {index} out of range ({len} values)")]
    DataOutOfRange {
        /// Offending operand
        index: u32,
        /// Data slice length
        len: usize,
    },

    /// Component id not declared in the template
    #[error("Unknown component {0}")]
    UnknownComponent(ComponentId),

    /// Component nesting exceeded the configured limit
    #[error("Maximum component nesting depth exceeded ({limit})")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// Render was interrupted (timeout/cancellation)
    #[error("Render interrupted")]
    Interrupted,

    /// Writing to the sink failed
    #[error("Sink error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Check if the error came from the sink rather than the template
    pub fn is_sink_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type for render operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;
