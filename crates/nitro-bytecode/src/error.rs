//! Bytecode errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or writing template artifacts
#[derive(Debug, Error)]
pub enum BytecodeError {
    /// Artifact file could not be read or written
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Instruction file is shorter than its declared header
    #[error("Truncated header: expected at least {expected} bytes, found {actual}")]
    TruncatedHeader {
        /// Bytes required by the component count
        expected: u64,
        /// Bytes actually present
        actual: u64,
    },

    /// Instruction stream length is not a multiple of the word size
    #[error("Instruction stream has {trailing} trailing bytes")]
    MisalignedInstructions {
        /// Bytes left over after the last whole word
        trailing: usize,
    },

    /// Word count does not match the sum of component lengths
    #[error("Instruction count mismatch: components declare {declared}, file holds {actual}")]
    InstructionCountMismatch {
        /// Sum of declared component lengths
        declared: u64,
        /// Instruction words present
        actual: u64,
    },

    /// Component lengths do not fit the 32-bit instruction address space
    #[error("Component lengths overflow the instruction address space")]
    LengthOverflow,

    /// Operand does not fit in 30 bits
    #[error("Operand out of range: {0}")]
    OperandOverflow(u32),

    /// Snippet contains the 0x00 terminator byte
    #[error("Snippet {0} contains a NUL byte")]
    SnippetContainsNul(usize),
}

impl BytecodeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for bytecode operations
pub type Result<T> = std::result::Result<T, BytecodeError>;
