//! Compiled template format
//!
//! Instruction artifact layout (little-endian throughout):
//!
//! ```text
//! [0, 4)                      component_count: u32
//! [4, 4 + 4*component_count)  component lengths: u32 each, declaration order
//! [4 + 4*component_count, ..) instruction words: u32 each
//! ```
//!
//! The number of instruction words must equal the sum of the lengths.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::component::{ComponentIndex, ComponentRange};
use crate::error::{BytecodeError, Result};
use crate::instruction::Instruction;
use crate::operand::{ComponentId, SnippetIndex};
use crate::snippet::SnippetTable;
use crate::{INSTRUCTION_EXTENSION, SNIPPET_EXTENSION};

const WORD_SIZE: usize = 4;

/// Locations of the two artifacts that make up one template set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Snippet artifact (`*.tmpl.txt`)
    pub snippets: PathBuf,
    /// Instruction artifact (`*.tmpl.ins`)
    pub instructions: PathBuf,
}

impl ArtifactPaths {
    /// Create from explicit paths
    pub fn new(snippets: impl Into<PathBuf>, instructions: impl Into<PathBuf>) -> Self {
        Self {
            snippets: snippets.into(),
            instructions: instructions.into(),
        }
    }

    /// Derive both paths from a shared stem: `out/main` becomes
    /// `out/main.tmpl.txt` and `out/main.tmpl.ins`
    pub fn from_stem(stem: impl AsRef<Path>) -> Self {
        let with_ext = |ext: &str| {
            let mut path = OsString::from(stem.as_ref().as_os_str());
            path.push(".");
            path.push(ext);
            PathBuf::from(path)
        };
        Self {
            snippets: with_ext(SNIPPET_EXTENSION),
            instructions: with_ext(INSTRUCTION_EXTENSION),
        }
    }
}

/// A loaded template set: snippet table, instruction table and component index.
///
/// Immutable once built. Share it between concurrent renders behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    snippets: SnippetTable,
    instructions: Vec<Instruction>,
    components: ComponentIndex,
}

impl Template {
    /// Create a new template builder
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::new()
    }

    /// Load a template set from its two artifact files
    pub fn load(snippet_path: impl AsRef<Path>, instruction_path: impl AsRef<Path>) -> Result<Self> {
        let snippet_path = snippet_path.as_ref();
        let instruction_path = instruction_path.as_ref();

        let snippet_bytes =
            fs::read(snippet_path).map_err(|e| BytecodeError::io(snippet_path, e))?;
        let instruction_bytes =
            fs::read(instruction_path).map_err(|e| BytecodeError::io(instruction_path, e))?;

        let template = Self::from_bytes(&snippet_bytes, &instruction_bytes)?;
        debug!(
            snippets = template.snippets.len(),
            instructions = template.instructions.len(),
            components = template.components.len(),
            path = %instruction_path.display(),
            "loaded template"
        );
        Ok(template)
    }

    /// Load a template set from [`ArtifactPaths`]
    pub fn load_paths(paths: &ArtifactPaths) -> Result<Self> {
        Self::load(&paths.snippets, &paths.instructions)
    }

    /// Decode both artifacts from memory
    pub fn from_bytes(snippet_bytes: &[u8], instruction_bytes: &[u8]) -> Result<Self> {
        let snippets = SnippetTable::parse(snippet_bytes);

        let actual = instruction_bytes.len() as u64;
        if instruction_bytes.len() < WORD_SIZE {
            return Err(BytecodeError::TruncatedHeader {
                expected: WORD_SIZE as u64,
                actual,
            });
        }

        let (count_bytes, rest) = instruction_bytes.split_at(WORD_SIZE);
        let count = read_word(count_bytes) as u64;
        let header_len = WORD_SIZE as u64 * (count + 1);
        if actual < header_len {
            return Err(BytecodeError::TruncatedHeader {
                expected: header_len,
                actual,
            });
        }

        let (length_bytes, body) = rest.split_at(count as usize * WORD_SIZE);
        let lengths: Vec<u32> = length_bytes.chunks_exact(WORD_SIZE).map(read_word).collect();

        let trailing = body.len() % WORD_SIZE;
        if trailing != 0 {
            return Err(BytecodeError::MisalignedInstructions { trailing });
        }

        let declared: u64 = lengths.iter().map(|&len| len as u64).sum();
        let words = (body.len() / WORD_SIZE) as u64;
        if declared != words {
            return Err(BytecodeError::InstructionCountMismatch {
                declared,
                actual: words,
            });
        }

        let components = ComponentIndex::from_lengths(lengths)?;
        let instructions = body
            .chunks_exact(WORD_SIZE)
            .map(|word| Instruction::decode(read_word(word)))
            .collect();

        Ok(Self {
            snippets,
            instructions,
            components,
        })
    }

    /// Encode the instruction artifact
    pub fn instructions_to_bytes(&self) -> Result<Vec<u8>> {
        let capacity = WORD_SIZE * (1 + self.components.len() + self.instructions.len());
        let mut bytes = Vec::with_capacity(capacity);

        bytes.extend_from_slice(&(self.components.len() as u32).to_le_bytes());
        for len in self.components.lengths() {
            bytes.extend_from_slice(&len.to_le_bytes());
        }
        for instruction in &self.instructions {
            bytes.extend_from_slice(&instruction.encode()?.to_le_bytes());
        }

        Ok(bytes)
    }

    /// Encode the snippet artifact
    pub fn snippets_to_bytes(&self) -> Vec<u8> {
        self.snippets.to_bytes()
    }

    /// Write both artifacts
    pub fn write(&self, paths: &ArtifactPaths) -> Result<()> {
        let instructions = self.instructions_to_bytes()?;
        fs::write(&paths.snippets, self.snippets_to_bytes())
            .map_err(|e| BytecodeError::io(&paths.snippets, e))?;
        fs::write(&paths.instructions, instructions)
            .map_err(|e| BytecodeError::io(&paths.instructions, e))?;
        Ok(())
    }

    /// Snippet table
    #[inline]
    pub fn snippets(&self) -> &SnippetTable {
        &self.snippets
    }

    /// Flat instruction table shared by all components
    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Component index
    #[inline]
    pub fn components(&self) -> &ComponentIndex {
        &self.components
    }

    /// Instruction range of a component
    #[inline]
    pub fn component_range(&self, id: ComponentId) -> Option<ComponentRange> {
        self.components.get(id)
    }

    /// Instructions of a component
    pub fn component_instructions(&self, id: ComponentId) -> Option<&[Instruction]> {
        let range = self.components.get(id)?;
        self.instructions.get(range.as_range())
    }
}

#[inline]
fn read_word(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Builder for creating templates
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    snippets: SnippetTable,
    instructions: Vec<Instruction>,
    components: ComponentIndex,
}

impl TemplateBuilder {
    /// Create a new template builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snippet, returns its index
    pub fn add_snippet(&mut self, snippet: impl Into<Vec<u8>>) -> Result<SnippetIndex> {
        self.snippets.push(snippet)
    }

    /// Add a component, returns its id.
    ///
    /// Components are laid out in the order they are added. On
    /// `LengthOverflow` the builder is left unchanged.
    pub fn add_component(
        &mut self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Result<ComponentId> {
        let before = self.instructions.len();
        self.instructions.extend(instructions);
        let added = u32::try_from(self.instructions.len() - before)
            .map_err(|_| BytecodeError::LengthOverflow)
            .and_then(|len| self.components.push(len));
        if added.is_err() {
            self.instructions.truncate(before);
        }
        added
    }

    /// Build the template
    pub fn build(self) -> Template {
        Template {
            snippets: self.snippets,
            instructions: self.instructions,
            components: self.components,
        }
    }
}
