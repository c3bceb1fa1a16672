//! Tally CLI - settlement reporting for trade instructions.
//!
//! # Usage
//!
//! ```bash
//! # Report on an instruction file
//! tally report instructions.csv
//!
//! # Only the entity rankings, as JSON
//! tally --format json report instructions.csv --view entities
//!
//! # Where does a Friday AED settlement land?
//! tally settle --date 2017-07-14 --currency AED
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = cli.settings.resolve()?;
    let format = cli.format;

    match cli.command {
        Commands::Report(args) => commands::report::execute(args, config, format)?,
        Commands::Settle(args) => commands::settle::execute(args, &config, format)?,
    }

    Ok(())
}

// Logs go to stderr so report output on stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tally_core=debug,tally_ext_csv=debug,tally_cli=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tally_core=warn,tally_ext_csv=warn,tally_cli=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
