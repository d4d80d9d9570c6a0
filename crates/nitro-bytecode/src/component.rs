//! Component index
//!
//! Components are declared by length only. Their instruction ranges are laid
//! out back to back in declaration order, so component `i` starts where
//! component `i - 1` ends.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{BytecodeError, Result};
use crate::operand::ComponentId;

/// Half-open `[start, end)` range into the instruction table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRange {
    /// First instruction
    pub start: u32,
    /// One past the last instruction
    pub end: u32,
}

impl ComponentRange {
    /// Number of instructions in the range
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range holds no instructions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// As a `usize` range for slicing
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Instruction ranges of all declared components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentIndex {
    ranges: Vec<ComponentRange>,
}

impl ComponentIndex {
    /// Derive ranges by prefix-summing declared lengths
    pub fn from_lengths(lengths: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut offset: u32 = 0;
        let ranges = lengths
            .into_iter()
            .map(|len| -> Result<ComponentRange> {
                let start = offset;
                offset = offset.checked_add(len).ok_or(BytecodeError::LengthOverflow)?;
                Ok(ComponentRange { start, end: offset })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranges })
    }

    /// Append a component of `len` instructions, returns its id
    pub fn push(&mut self, len: u32) -> Result<ComponentId> {
        let start = self.total_len();
        let end = start.checked_add(len).ok_or(BytecodeError::LengthOverflow)?;
        let id = u32::try_from(self.ranges.len())
            .map(ComponentId)
            .map_err(|_| BytecodeError::LengthOverflow)?;
        self.ranges.push(ComponentRange { start, end });
        Ok(id)
    }

    /// Get the range of a component
    #[inline]
    pub fn get(&self, id: ComponentId) -> Option<ComponentRange> {
        self.ranges.get(id.index() as usize).copied()
    }

    /// Declared lengths, in declaration order
    pub fn lengths(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().map(ComponentRange::len)
    }

    /// Total number of instructions covered
    #[inline]
    pub fn total_len(&self) -> u32 {
        self.ranges.last().map(|r| r.end).unwrap_or(0)
    }

    /// Number of components
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if no components are declared
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over `(id, range)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, ComponentRange)> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .map(|(i, r)| (ComponentId(i as u32), *r))
    }
}
