use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use donation_analytics::{logging, run_files, RunConfig};

/// Find repeat donors and report running contribution percentiles
#[derive(Parser, Debug)]
#[command(name = "donation-analytics", version)]
struct Cli {
    /// Pipe-delimited itemized contribution records
    input: PathBuf,

    /// File holding the target percentile (1-100)
    percentile: PathBuf,

    /// Where to write repeat-donor rows
    output: PathBuf,
}

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = RunConfig::new(cli.input, cli.percentile, cli.output).with_summary_from_env();

    let stats = run_files(&config).with_context(|| {
        format!(
            "donation analytics failed for {}",
            config.input.display()
        )
    })?;

    tracing::debug!("{}", stats.summary());

    Ok(())
}
