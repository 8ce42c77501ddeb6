//! Read-side query service over the snapshot store and account directory.
//!
//! Every call reloads from disk and recomputes; nothing is cached.

use crate::detail::{account_detail, AccountDetail};
use crate::history::{video_history, HistoryPoint};
use crate::rollup::{dashboard_stats, DashboardStats};
use playwatch_core::StorageConfig;
use playwatch_data::{Account, AccountDirectory, BatchStore, Snapshot, StorageError};

/// Blocking query facade used by the REST layer and the CLI.
#[derive(Debug, Clone)]
pub struct StatsQueries {
    store: BatchStore,
    directory: AccountDirectory,
}

impl StatsQueries {
    #[must_use]
    pub fn new(store: BatchStore, directory: AccountDirectory) -> Self {
        Self { store, directory }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        let mut store = BatchStore::new(&config.data_dir);
        if let Some(legacy) = &config.legacy_records_file {
            store = store.with_legacy_file(legacy);
        }
        Self::new(store, AccountDirectory::new(&config.accounts_file))
    }

    #[must_use]
    pub fn store(&self) -> &BatchStore {
        &self.store
    }

    #[must_use]
    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    /// Raw snapshots from every batch, regardless of the directory.
    #[must_use]
    pub fn list_all_snapshots(&self, limit: usize) -> Vec<Snapshot> {
        self.store.list(limit)
    }

    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        dashboard_stats(&self.directory.load_or_empty(), self.store.load_all())
    }

    #[must_use]
    pub fn account_detail(&self, account_id: &str) -> AccountDetail {
        account_detail(
            &self.directory.load_or_empty(),
            self.store.load_all(),
            account_id,
        )
    }

    #[must_use]
    pub fn video_history(&self, key: &str) -> Vec<HistoryPoint> {
        video_history(self.store.load_all(), key)
    }

    #[must_use]
    pub fn account_directory(&self) -> Vec<Account> {
        self.directory.load_or_empty()
    }

    /// Replaces the directory with `accounts`.
    ///
    /// # Errors
    /// Returns an error if the directory file cannot be written.
    pub fn replace_account_directory(&self, accounts: &[Account]) -> Result<(), StorageError> {
        self.directory.replace(accounts)
    }
}
