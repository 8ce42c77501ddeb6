use super::{print_json, DEFAULT_CONFIG_PATH};
use anyhow::Result;
use clap::Args;
use playwatch_core::ConfigLoader;
use playwatch_growth::StatsQueries;

/// Arguments for the dashboard command.
#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Show the per-video detail of one account instead
    #[arg(long)]
    pub account: Option<String>,
}

/// Prints dashboard or account detail figures as JSON.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let queries = StatsQueries::from_config(&config.storage);

    match args.account {
        Some(account_id) => print_json(&queries.account_detail(&account_id)),
        None => print_json(&queries.dashboard_stats()),
    }
}
