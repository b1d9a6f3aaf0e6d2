//! Rolling IRR CLI
//!
//! Command-line entrypoint that runs the IRR pipeline from a CSV snapshot
//! export to a CSV or NDJSON results file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use rolling_irr::config::ConfigOverrides;
use rolling_irr::repository::{CsvSourceRepository, FileDestinationRepository, OutputFormat};
use rolling_irr::{irr_pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "rolling-irr", version, about = "Rolling IRR per account from cashflow snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the rolling IRR of every account and replace the destination
    CalculateIrr {
        /// Cashflow snapshot CSV (overrides IRR_SOURCE_PATH)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Results file (overrides IRR_DESTINATION_PATH)
        #[arg(long)]
        destination: Option<PathBuf>,

        /// Output encoding (overrides IRR_OUTPUT_FORMAT)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Compute accounts one at a time
        #[arg(long)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CalculateIrr {
            source,
            destination,
            format,
            sequential,
        } => {
            let overrides = ConfigOverrides {
                source_path: source,
                destination_path: destination,
                output_format: format,
                sequential,
            };
            let config = PipelineConfig::load(overrides).context("invalid pipeline configuration")?;
            calculate_irr(&config)
        }
    }
}

fn calculate_irr(config: &PipelineConfig) -> Result<()> {
    let start = Instant::now();
    let source = CsvSourceRepository::new(&config.source_path);
    let mut destination = FileDestinationRepository::new(&config.destination_path, config.output_format);

    info!(
        "Starting IRR pipeline execution: {} -> {} ({:?})",
        source.path().display(),
        destination.path().display(),
        destination.format()
    );
    let summary = irr_pipeline(&source, &mut destination, config.parallel).with_context(|| {
        format!(
            "IRR pipeline failed ({} -> {})",
            source.path().display(),
            destination.path().display()
        )
    })?;
    info!("Completed IRR pipeline execution in {:?}", start.elapsed());

    info!(
        "Accounts: {}, snapshots: {}, IRRs: {} ({} unresolved), rows written: {}, skipped: {}",
        summary.accounts,
        summary.cashflow_snapshots,
        summary.irr_snapshots,
        summary.unresolved_rates,
        summary.load.written,
        summary.load.skipped,
    );

    Ok(())
}
