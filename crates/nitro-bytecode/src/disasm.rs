//! Human-readable listing of a template

use std::io::{self, Write};

use crate::instruction::Instruction;
use crate::template::Template;

/// Longest snippet preview shown next to a `CopySnippet`
const PREVIEW_LEN: usize = 40;

/// Write a disassembly of every component in `template`
pub fn disassemble<W: Write>(template: &Template, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "; {} snippets, {} instructions, {} components",
        template.snippets().len(),
        template.instructions().len(),
        template.components().len()
    )?;

    for (id, range) in template.components().iter() {
        writeln!(out)?;
        writeln!(
            out,
            "component {} [{}, {}) {} instructions",
            id.index(),
            range.start,
            range.end,
            range.len()
        )?;

        let instructions = &template.instructions()[range.as_range()];
        for (offset, instruction) in instructions.iter().enumerate() {
            let pc = range.start as usize + offset;
            write!(out, "  {:06}  ", pc)?;
            write_instruction(template, instruction, out)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn write_instruction<W: Write>(
    template: &Template,
    instruction: &Instruction,
    out: &mut W,
) -> io::Result<()> {
    let name = instruction.opcode().name();
    match instruction {
        Instruction::CopySnippet { snippet } => {
            write!(out, "{:<14} {}", name, snippet.index())?;
            match template.snippets().get(*snippet) {
                Some(bytes) => write!(out, "  ; {}", preview(bytes)),
                None => write!(out, "  ; <out of range>"),
            }
        }
        Instruction::CopyData { data } => write!(out, "{:<14} {}", name, data.index()),
        Instruction::ExecComponent => write!(out, "{}", name),
        Instruction::PushComponent { component } => {
            write!(out, "{:<14} {}", name, component.index())
        }
    }
}

/// Quote a snippet, escaping control characters and truncating long text
fn preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut quoted: String = text.chars().take(PREVIEW_LEN).flat_map(char::escape_debug).collect();
    if text.chars().count() > PREVIEW_LEN {
        quoted.push_str("...");
    }
    format!("\"{}\"", quoted)
}
