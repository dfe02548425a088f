//! CLI command definitions and dispatch.

pub mod hooks;
pub mod media;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use tinybit_core::config::AppConfig;
use tinybit_core::error::AppError;

/// TinyBit — convention-registered hook targets and media tooling
#[derive(Debug, Parser)]
#[command(name = "tinybit", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hook registration inspection
    Hooks(hooks::HooksArgs),
    /// Image maintenance
    Media(media::MediaArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Hooks(args) => hooks::execute(args, config, self.format).await,
            Commands::Media(args) => media::execute(args, config).await,
        }
    }
}
