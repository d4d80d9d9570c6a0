//! # Nitro Bytecode
//!
//! This crate defines the compiled template format for the Nitro server.
//!
//! A compiled template set is two co-located artifacts:
//!
//! - **Snippet file** (`*.tmpl.txt`): static byte fragments, each terminated by `0x00`
//! - **Instruction file** (`*.tmpl.ins`): a little-endian component length table
//!   followed by a flat stream of 32-bit bit-packed instruction words
//!
//! ## Design Principles
//!
//! - **Stack-based**: Components invoke each other through an explicit call stack
//! - **Compact**: One `u32` per instruction, 2-bit opcode and 30-bit operand
//! - **Decoded once**: Words are decoded into [`Instruction`] at load time
//! - **Immutable**: A loaded [`Template`] is read-only and shared across renders

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod component;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod operand;
pub mod snippet;
pub mod template;
pub mod verify;

pub use component::{ComponentIndex, ComponentRange};
pub use error::BytecodeError;
pub use instruction::{Instruction, Opcode};
pub use operand::{ComponentId, DataIndex, SnippetIndex};
pub use snippet::SnippetTable;
pub use template::{ArtifactPaths, Template, TemplateBuilder};
pub use verify::{Severity, VerifyIssue};

/// Number of bits the opcode is shifted left in an instruction word
pub const OPCODE_SHIFT: u32 = 30;

/// Mask selecting the operand bits of an instruction word
pub const OPERAND_MASK: u32 = u32::MAX >> 2;

/// File extension of the snippet artifact
pub const SNIPPET_EXTENSION: &str = "tmpl.txt";

/// File extension of the instruction artifact
pub const INSTRUCTION_EXTENSION: &str = "tmpl.ins";
