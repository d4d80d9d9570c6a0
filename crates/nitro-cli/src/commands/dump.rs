//! Dump command - print a disassembly of the template.

use anyhow::Result;
use clap::Args;
use nitro_bytecode::disasm::disassemble;
use std::io::{BufWriter, Write};

use super::TemplateArgs;
use crate::config::Config;

#[derive(Args)]
pub struct DumpCommand {
    #[command(flatten)]
    pub template: TemplateArgs,
}

impl DumpCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let template = self.template.load(config)?;

        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        disassemble(&template, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
