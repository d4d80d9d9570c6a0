//! Bytecode instructions (opcodes)
//!
//! An instruction word is a `u32`: the top 2 bits select the opcode and the
//! low 30 bits carry the operand.
//!
//! ```text
//!  31 30 29                                                    0
//! +-----+-------------------------------------------------------+
//! | op  |                        operand                        |
//! +-----+-------------------------------------------------------+
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BytecodeError, Result};
use crate::operand::{ComponentId, DataIndex, SnippetIndex};
use crate::{OPCODE_SHIFT, OPERAND_MASK};

/// Bytecode opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// Append snippets\[operand\] to the output
    CopySnippet = 0,
    /// Append data\[operand\] to the output
    CopyData = 1,
    /// Pop a component id from the call stack and render it; operand unused
    ExecComponent = 2,
    /// Push operand onto the call stack
    PushComponent = 3,
}

impl Opcode {
    /// Convert from the two opcode bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::CopySnippet),
            1 => Some(Self::CopyData),
            2 => Some(Self::ExecComponent),
            3 => Some(Self::PushComponent),
            _ => None,
        }
    }

    /// Convert to raw bits
    #[inline]
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Get opcode name
    pub fn name(self) -> &'static str {
        match self {
            Self::CopySnippet => "CopySnippet",
            Self::CopyData => "CopyData",
            Self::ExecComponent => "ExecComponent",
            Self::PushComponent => "PushComponent",
        }
    }
}

/// A decoded instruction with its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Append a static snippet to the output
    CopySnippet {
        /// Snippet to copy
        snippet: SnippetIndex,
    },
    /// Append a dynamic data value to the output
    CopyData {
        /// Position in the caller's data slice
        data: DataIndex,
    },
    /// Pop a component id and render it against the same data
    ExecComponent,
    /// Push a component id for a later [`Instruction::ExecComponent`]
    PushComponent {
        /// Component to push
        component: ComponentId,
    },
}

impl Instruction {
    /// Copy snippet `index`
    #[inline]
    pub const fn copy_snippet(index: u32) -> Self {
        Self::CopySnippet {
            snippet: SnippetIndex(index),
        }
    }

    /// Copy data value `index`
    #[inline]
    pub const fn copy_data(index: u32) -> Self {
        Self::CopyData {
            data: DataIndex(index),
        }
    }

    /// Push component `id`
    #[inline]
    pub const fn push_component(id: u32) -> Self {
        Self::PushComponent {
            component: ComponentId(id),
        }
    }

    /// Decode a raw instruction word.
    ///
    /// Every word decodes: the two opcode bits cover all four opcodes.
    /// The operand bits of `ExecComponent` are ignored.
    #[inline]
    pub fn decode(word: u32) -> Self {
        let operand = word & OPERAND_MASK;
        match word >> OPCODE_SHIFT {
            0 => Self::CopySnippet {
                snippet: SnippetIndex(operand),
            },
            1 => Self::CopyData {
                data: DataIndex(operand),
            },
            2 => Self::ExecComponent,
            _ => Self::PushComponent {
                component: ComponentId(operand),
            },
        }
    }

    /// Encode into a raw instruction word
    pub fn encode(self) -> Result<u32> {
        let operand = self.operand();
        if operand > OPERAND_MASK {
            return Err(BytecodeError::OperandOverflow(operand));
        }
        Ok(((self.opcode().to_bits() as u32) << OPCODE_SHIFT) | operand)
    }

    /// Get the opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::CopySnippet { .. } => Opcode::CopySnippet,
            Self::CopyData { .. } => Opcode::CopyData,
            Self::ExecComponent => Opcode::ExecComponent,
            Self::PushComponent { .. } => Opcode::PushComponent,
        }
    }

    /// Get the raw operand (0 for `ExecComponent`)
    pub fn operand(&self) -> u32 {
        match self {
            Self::CopySnippet { snippet } => snippet.index(),
            Self::CopyData { data } => data.index(),
            Self::ExecComponent => 0,
            Self::PushComponent { component } => component.index(),
        }
    }
}
