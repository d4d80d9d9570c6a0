//! CLI command implementations.

pub mod check;
pub mod dump;
pub mod render;

use anyhow::{Context, Result};
use clap::Args;
use nitro_bytecode::{ArtifactPaths, Template};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;

/// Selects the template artifacts to load
#[derive(Args)]
pub struct TemplateArgs {
    /// Artifact stem: `out/main` loads `out/main.tmpl.txt` and `out/main.tmpl.ins`
    #[arg(long, short = 't', value_name = "STEM")]
    pub template: Option<PathBuf>,
}

impl TemplateArgs {
    /// Load the template named on the command line or in the config file.
    ///
    /// A template that fails to load is fatal for every command.
    pub fn load(&self, config: &Config) -> Result<Template> {
        let stem = self
            .template
            .clone()
            .or_else(|| config.template.clone())
            .context("no template given; pass --template or set `template` in nitro.toml")?;
        let paths = ArtifactPaths::from_stem(&stem);

        let template = Template::load_paths(&paths)
            .with_context(|| format!("failed to load template {}", stem.display()))?;
        info!(
            template = %stem.display(),
            components = template.components().len(),
            "template loaded"
        );
        Ok(template)
    }
}
