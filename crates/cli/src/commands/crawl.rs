//! One-shot ingestion cycle.

use super::{build_ingestor, DEFAULT_CONFIG_PATH};
use anyhow::{bail, Result};
use clap::Args;
use playwatch_core::ConfigLoader;

/// Arguments for the crawl command.
#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

/// Runs a single ingestion cycle and prints its report.
///
/// # Errors
/// Returns an error if setup fails or the batch could not be written.
/// Individual account failures are reported but do not fail the command.
pub async fn run_crawl(args: CrawlArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let ingestor = build_ingestor(&config)?;

    let report = ingestor.run_cycle().await;

    println!("Cycle:     {}", report.cycle_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Accounts:  {}/{} fetched",
        report.accounts_succeeded, report.accounts_total
    );
    println!("Snapshots: {}", report.snapshots_collected);
    match &report.batch_path {
        Some(path) => println!("Batch:     {}", path.display()),
        None => println!("Batch:     (none written)"),
    }
    for error in &report.errors {
        println!("  ! {error}");
    }

    if report.storage_failed() {
        bail!("cycle batch could not be persisted");
    }
    Ok(())
}
