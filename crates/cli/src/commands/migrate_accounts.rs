//! Resolve placeholder account names in the directory.

use super::{build_client, print_json, DEFAULT_CONFIG_PATH};
use anyhow::{Context, Result};
use clap::Args;
use playwatch_collector::{bootstrap_directory, resolve_account_names};
use playwatch_core::ConfigLoader;
use playwatch_data::AccountDirectory;
use std::time::Duration;

/// Arguments for the migrate-accounts command.
#[derive(Args, Debug, Clone)]
pub struct MigrateAccountsArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print the resolved directory without writing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Looks up display names for accounts that only have an id and rewrites
/// the directory in the `{id, name}` layout.
///
/// # Errors
/// Returns an error if the directory is missing, malformed or cannot be written.
pub async fn run_migrate_accounts(args: MigrateAccountsArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let client = build_client(&config)?;
    let directory = AccountDirectory::new(&config.storage.accounts_file);
    let delay = Duration::from_millis(config.ingestion.account_delay_ms);

    let accounts = if args.dry_run {
        let current = directory.load().context("Failed to load account directory")?;
        resolve_account_names(client.as_ref(), &current, delay).await
    } else {
        bootstrap_directory(client.as_ref(), &directory, delay)
            .await
            .context("Failed to migrate account directory")?
    };

    print_json(&accounts)?;
    if !args.dry_run {
        tracing::info!(
            path = %directory.path().display(),
            accounts = accounts.len(),
            "Account directory migrated"
        );
    }
    Ok(())
}
