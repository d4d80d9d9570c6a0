mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;

use commands::check::CheckCommand;
use commands::dump::DumpCommand;
use commands::render::RenderCommand;

#[derive(Parser)]
#[command(name = "nitro", version, about = "Nitro compiled template tools")]
struct Cli {
    /// Path to nitro.toml (searched for upward from the current directory by default)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a component to stdout
    Render(RenderCommand),
    /// Print a disassembly of the template
    Dump(DumpCommand),
    /// Load the template and report static problems
    Check(CheckCommand),
}

fn main() {
    // Logs go to stderr; stdout carries rendered output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(cmd) => cmd.run(&config),
        Commands::Dump(cmd) => cmd.run(&config),
        Commands::Check(cmd) => cmd.run(&config),
    }
}
