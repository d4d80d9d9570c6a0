//! Snippet table for compiled templates

use tracing::warn;

use crate::error::{BytecodeError, Result};
use crate::operand::SnippetIndex;

/// Snippet terminator byte
pub const SNIPPET_TERMINATOR: u8 = 0x00;

/// Static output fragments, addressed by [`SnippetIndex`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetTable {
    snippets: Vec<Box<[u8]>>,
}

impl SnippetTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the snippet artifact.
    ///
    /// Each snippet is terminated by a single `0x00`. Bytes after the last
    /// terminator do not form a snippet and are dropped.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut parts: Vec<&[u8]> = bytes.split(|&b| b == SNIPPET_TERMINATOR).collect();
        // split() always yields the tail after the final terminator
        match parts.pop() {
            Some(tail) if !tail.is_empty() => {
                warn!(bytes = tail.len(), "dropping unterminated trailing snippet data");
            }
            _ => {}
        }

        Self {
            snippets: parts.into_iter().map(Box::from).collect(),
        }
    }

    /// Encode as the snippet artifact
    pub fn to_bytes(&self) -> Vec<u8> {
        let size = self.snippets.iter().map(|s| s.len() + 1).sum();
        let mut bytes = Vec::with_capacity(size);
        for snippet in &self.snippets {
            bytes.extend_from_slice(snippet);
            bytes.push(SNIPPET_TERMINATOR);
        }
        bytes
    }

    /// Append a snippet, returns its index
    pub fn push(&mut self, snippet: impl Into<Vec<u8>>) -> Result<SnippetIndex> {
        let snippet = snippet.into();
        let idx = self.snippets.len();
        if snippet.contains(&SNIPPET_TERMINATOR) {
            return Err(BytecodeError::SnippetContainsNul(idx));
        }
        self.snippets.push(snippet.into_boxed_slice());
        Ok(SnippetIndex(idx as u32))
    }

    /// Get a snippet by index
    #[inline]
    pub fn get(&self, index: SnippetIndex) -> Option<&[u8]> {
        self.snippets.get(index.index() as usize).map(|s| &**s)
    }

    /// Number of snippets
    #[inline]
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Check if the table is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Iterate over snippets in index order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.snippets.iter().map(|s| &**s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snippets() {
        let table = SnippetTable::parse(b"<b>\0</b>\0");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(SnippetIndex(0)), Some(&b"<b>"[..]));
        assert_eq!(table.get(SnippetIndex(1)), Some(&b"</b>"[..]));
        assert_eq!(table.get(SnippetIndex(2)), None);
    }

    #[test]
    fn test_parse_empty_snippets() {
        let table = SnippetTable::parse(b"\0\0a\0");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(SnippetIndex(0)), Some(&b""[..]));
        assert_eq!(table.get(SnippetIndex(2)), Some(&b"a"[..]));
    }

    #[test]
    fn test_parse_drops_unterminated_tail() {
        let table = SnippetTable::parse(b"one\0two");
        assert_eq!(table.len(), 1);
        assert!(SnippetTable::parse(b"").is_empty());
    }

    #[test]
    fn test_push_rejects_nul() {
        let mut table = SnippetTable::new();
        assert_eq!(table.push("ok").unwrap(), SnippetIndex(0));
        assert!(matches!(
            table.push(b"a\0b".to_vec()),
            Err(BytecodeError::SnippetContainsNul(1))
        ));
        assert_eq!(table.to_bytes(), b"ok\0");
    }
}
