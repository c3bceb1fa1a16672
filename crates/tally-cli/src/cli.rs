//! CLI argument definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tally_core::config::{ReportConfig, Validate};

use crate::commands::{ReportArgs, SettleArgs};

/// Tally - settlement reporting for trade instructions
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate an instruction file into settlement totals and entity rankings
    Report(ReportArgs),

    /// Show the effective settlement date for a single currency and date
    Settle(SettleArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Report configuration options shared by all commands.
#[derive(Args, Debug, Default)]
pub struct Settings {
    /// Configuration file (TOML, or JSON by extension)
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Currency settling on a Sunday-Thursday week (repeatable, replaces the configured set)
    #[arg(long = "st-currency", value_name = "CODE", global = true)]
    pub st_currencies: Vec<String>,

    /// chrono format of the date columns in instruction files
    #[arg(long, value_name = "FORMAT", global = true)]
    pub date_format: Option<String>,
}

impl Settings {
    /// Loads the configuration file, if any, and applies command-line overrides.
    pub fn resolve(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if !self.st_currencies.is_empty() {
            config = config.with_sunday_thursday_currencies(self.st_currencies.iter().cloned());
        }
        if let Some(format) = &self.date_format {
            config = config.with_date_format(format.clone());
        }

        config.validate_or_error()?;
        tracing::debug!(?config, "resolved report configuration");
        Ok(config)
    }
}
