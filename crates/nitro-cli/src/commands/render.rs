//! Render command - render one component to stdout.

use anyhow::{Context, Result};
use clap::Args;
use nitro_bytecode::ComponentId;
use nitro_vm::{RenderConfig, Renderer};
use std::io::{BufWriter, Write};
use std::time::Duration;

use super::TemplateArgs;
use crate::config::Config;

#[derive(Args)]
pub struct RenderCommand {
    /// Component id to render
    pub component: u32,

    /// Dynamic data values, in operand order
    #[arg(long = "data", short = 'd', value_name = "VALUE")]
    pub data: Vec<String>,

    /// Timeout in milliseconds (0 = no timeout)
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Maximum component nesting depth (at least 1)
    #[arg(long = "max-depth", value_parser = parse_max_depth)]
    pub max_depth: Option<usize>,

    #[command(flatten)]
    pub template: TemplateArgs,
}

impl RenderCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let template = self.template.load(config)?;
        let renderer = Renderer::with_config(template, self.render_config(config));

        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let result = renderer.render(ComponentId(self.component), self.data.as_slice(), &mut out);

        // Partial output is still delivered
        out.flush()?;
        result.with_context(|| format!("failed to render component {}", self.component))
    }

    /// Command-line flags override the config file
    fn render_config(&self, config: &Config) -> RenderConfig {
        let mut render = config.render.clone();
        if let Some(max_depth) = self.max_depth {
            render.max_depth = max_depth;
        }
        match self.timeout_ms {
            Some(0) => render.timeout = None,
            Some(ms) => render.timeout = Some(Duration::from_millis(ms)),
            None => {}
        }
        render
    }
}

fn parse_max_depth(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(depth) => Ok(depth),
        Err(e) => Err(e.to_string()),
    }
}
