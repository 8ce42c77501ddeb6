//! CLI commands for the play-count monitor.

pub mod crawl;
pub mod dashboard;
pub mod history;
pub mod migrate_accounts;
pub mod run;

pub use crawl::{run_crawl, CrawlArgs};
pub use dashboard::{run_dashboard, DashboardArgs};
pub use history::{run_history, HistoryArgs};
pub use migrate_accounts::{run_migrate_accounts, MigrateAccountsArgs};
pub use run::run_daemon;

use anyhow::{Context, Result};
use playwatch_collector::{IngestionPolicy, Ingestor};
use playwatch_core::{AppConfig, SystemClock};
use playwatch_data::{AccountDirectory, BatchStore};
use playwatch_haokan::{HaokanClient, HaokanClientConfig};
use serde::Serialize;
use std::sync::Arc;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub(crate) type LiveIngestor = Ingestor<HaokanClient, SystemClock>;

pub(crate) fn build_client(config: &AppConfig) -> Result<Arc<HaokanClient>> {
    let client = HaokanClient::new(HaokanClientConfig::from(&config.haokan))
        .context("Failed to build listing API client")?;
    Ok(Arc::new(client))
}

pub(crate) fn build_store(config: &AppConfig) -> BatchStore {
    let store = BatchStore::new(&config.storage.data_dir);
    match &config.storage.legacy_records_file {
        Some(legacy) => store.with_legacy_file(legacy),
        None => store,
    }
}

pub(crate) fn build_ingestor(config: &AppConfig) -> Result<Arc<LiveIngestor>> {
    Ok(Arc::new(Ingestor::new(
        build_client(config)?,
        Arc::new(SystemClock),
        build_store(config),
        AccountDirectory::new(&config.storage.accounts_file),
        IngestionPolicy::from_config(&config.ingestion, config.haokan.page_size),
    )))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
