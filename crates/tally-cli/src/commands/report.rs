//! Report command implementation.
//!
//! Loads an instruction file and prints settlement totals by date and
//! entity rankings for each side.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tally_core::config::{InvalidRowPolicy, ReportConfig};
use tally_core::report::{AggregationEngine, SettlementReport};
use tally_core::types::Direction;
use tally_ext_csv::{load_instructions, read_instructions, InstructionBatch};

use crate::cli::OutputFormat;
use crate::output::{
    print_header, print_rows, print_section, print_single, print_summary, print_warning,
    side_label, DateTotalRow, RankingRow,
};

/// Sells are listed before buys in every section.
const SIDES: [Direction; 2] = [Direction::Sell, Direction::Buy];

/// Arguments for the report command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Headerless instruction CSV; `-` reads standard input
    pub input: PathBuf,

    /// Sections to print (JSON output always carries the full report)
    #[arg(long, value_enum, default_value = "all")]
    pub view: ReportView,

    /// Skip invalid rows instead of aborting on the first one
    #[arg(long)]
    pub skip_invalid: bool,

    /// Run the aggregation folds in parallel (needs the `parallel` feature)
    #[arg(long)]
    pub parallel: bool,
}

/// Report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportView {
    /// Totals by effective settlement date
    Dates,
    /// Entity rankings
    Entities,
    /// Both
    All,
}

impl ReportView {
    fn dates(self) -> bool {
        matches!(self, ReportView::Dates | ReportView::All)
    }

    fn entities(self) -> bool {
        matches!(self, ReportView::Entities | ReportView::All)
    }
}

/// Execute the report command.
pub fn execute(args: ReportArgs, mut config: ReportConfig, format: OutputFormat) -> Result<()> {
    if args.skip_invalid {
        config = config.with_invalid_rows(InvalidRowPolicy::Skip);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }

    let batch = load(&args.input, &config)?;
    for skipped in &batch.skipped {
        print_warning(&format!("skipped {skipped}"));
    }

    let report = AggregationEngine::from_config(&config).build_report(&batch.records);

    match format {
        OutputFormat::Json => print_single(&report, format),
        OutputFormat::Table => print_table(&report, args.view),
        OutputFormat::Csv => print_csv(&report, args.view),
    }
}

fn load(input: &Path, config: &ReportConfig) -> Result<InstructionBatch> {
    if input.as_os_str() == "-" {
        return read_instructions(io::stdin().lock(), config)
            .context("failed to read instructions from stdin");
    }
    load_instructions(input, config)
        .with_context(|| format!("failed to read instructions from {}", input.display()))
}

fn date_rows(report: &SettlementReport, direction: Direction) -> Vec<DateTotalRow> {
    report
        .by_date
        .get(direction)
        .iter()
        .map(|aggregate| DateTotalRow::new(direction, aggregate))
        .collect()
}

fn print_table(report: &SettlementReport, view: ReportView) -> Result<()> {
    if view.dates() {
        print_header("Settlement totals");
        for direction in SIDES {
            print_section(&format!("{} TOTALS:", side_label(direction)));
            print_rows(&date_rows(report, direction), OutputFormat::Table)?;
            print_summary(report.total(direction), report.record_count(direction));
        }
    }

    if view.entities() {
        print_header("Entity ranking");
        for direction in SIDES {
            print_section(&format!("{} RANKING:", side_label(direction)));
            let rows = RankingRow::ranked(direction, report.by_entity.get(direction));
            print_rows(&rows, OutputFormat::Table)?;
        }
    }

    Ok(())
}

fn print_csv(report: &SettlementReport, view: ReportView) -> Result<()> {
    if view.dates() {
        let rows: Vec<_> = SIDES
            .into_iter()
            .flat_map(|direction| date_rows(report, direction))
            .collect();
        print_rows(&rows, OutputFormat::Csv)?;
    }

    if view == ReportView::All {
        println!();
    }

    if view.entities() {
        let rows: Vec<_> = SIDES
            .into_iter()
            .flat_map(|direction| RankingRow::ranked(direction, report.by_entity.get(direction)))
            .collect();
        print_rows(&rows, OutputFormat::Csv)?;
    }

    Ok(())
}
