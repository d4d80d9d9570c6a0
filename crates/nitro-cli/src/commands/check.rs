//! Check command - load a template and report static problems.

use anyhow::{Result, bail};
use clap::Args;
use nitro_bytecode::{Severity, VerifyIssue};

use super::TemplateArgs;
use crate::config::Config;

#[derive(Args)]
pub struct CheckCommand {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub template: TemplateArgs,
}

impl CheckCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let template = self.template.load(config)?;
        let issues = template.verify();

        for issue in &issues {
            let label = match issue.severity() {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            println!("{label}: {issue}");
        }

        let failures = count_failures(&issues, self.strict);
        if failures > 0 {
            bail!("{failures} problem(s) found");
        }

        println!(
            "ok: {} components, {} instructions, {} snippets",
            template.components().len(),
            template.instructions().len(),
            template.snippets().len()
        );
        Ok(())
    }
}

fn count_failures(issues: &[VerifyIssue], strict: bool) -> usize {
    issues
        .iter()
        .filter(|issue| strict || issue.severity() == Severity::Error)
        .count()
}
