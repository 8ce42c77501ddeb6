//! One ingestion cycle: fetch every tracked account, persist one batch.

use crate::error::CycleError;
use crate::report::CycleReport;
use async_trait::async_trait;
use chrono::SubsecRound;
use playwatch_core::{Clock, IngestionConfig};
use playwatch_data::{Account, AccountDirectory, BatchStore, Snapshot};
use playwatch_haokan::{ListingPages, VideoEntry, VideoSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Pacing and retry settings for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionPolicy {
    pub page_size: u32,
    pub max_pages: u32,
    /// Attempts per account, including the first.
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub page_delay: Duration,
    pub account_delay: Duration,
}

impl Default for IngestionPolicy {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default(), 20)
    }
}

impl IngestionPolicy {
    #[must_use]
    pub fn from_config(config: &IngestionConfig, page_size: u32) -> Self {
        Self {
            page_size,
            max_pages: config.max_pages,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_secs(config.retry_backoff_secs),
            page_delay: Duration::from_millis(config.page_delay_ms),
            account_delay: Duration::from_millis(config.account_delay_ms),
        }
    }

    /// Same budget without any sleeping.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            retry_backoff: Duration::ZERO,
            page_delay: Duration::ZERO,
            account_delay: Duration::ZERO,
            ..self
        }
    }
}

/// Something that can run an ingestion cycle on demand.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self) -> CycleReport;
}

/// Starts a cycle in the background and returns immediately.
pub fn trigger_cycle(runner: Arc<dyn CycleRunner>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let report = runner.run_cycle().await;
        if !report.is_clean() {
            warn!(
                cycle_at = %report.cycle_at,
                errors = report.errors.len(),
                "Triggered cycle finished with errors"
            );
        }
    })
}

/// Fetches every tracked account and appends one snapshot batch per cycle.
pub struct Ingestor<S: ?Sized, C: ?Sized> {
    source: Arc<S>,
    clock: Arc<C>,
    store: BatchStore,
    directory: AccountDirectory,
    policy: IngestionPolicy,
}

impl<S, C> Ingestor<S, C>
where
    S: VideoSource + ?Sized,
    C: Clock + ?Sized,
{
    #[must_use]
    pub fn new(
        source: Arc<S>,
        clock: Arc<C>,
        store: BatchStore,
        directory: AccountDirectory,
        policy: IngestionPolicy,
    ) -> Self {
        Self {
            source,
            clock,
            store,
            directory,
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &IngestionPolicy {
        &self.policy
    }

    /// Runs one cycle. Never fails; problems are recorded in the report.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle_at = self.clock.now().trunc_subsecs(0);
        let directory = self.directory.clone();
        let accounts = match tokio::task::spawn_blocking(move || directory.load_or_empty()).await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!(error = %e, "Account directory load task failed");
                Vec::new()
            }
        };
        let mut report = CycleReport::new(cycle_at, accounts.len());

        info!(cycle_at = %cycle_at, accounts = accounts.len(), "Starting ingestion cycle");

        let mut snapshots: Vec<Snapshot> = Vec::new();
        for (index, account) in accounts.iter().enumerate() {
            if index > 0 && !self.policy.account_delay.is_zero() {
                tokio::time::sleep(self.policy.account_delay).await;
            }

            match self.fetch_account(account).await {
                Ok(entries) => {
                    info!(account_id = %account.id, videos = entries.len(), "Fetched account");
                    report.accounts_succeeded += 1;
                    snapshots.extend(
                        entries
                            .into_iter()
                            .map(|entry| entry.into_snapshot(account, cycle_at)),
                    );
                }
                Err(e) => {
                    error!(account_id = %account.id, error = %e, "Account skipped this cycle");
                    report.errors.push(e);
                }
            }
        }

        report.snapshots_collected = snapshots.len();
        let store = self.store.clone();
        let written =
            tokio::task::spawn_blocking(move || store.write_batch(cycle_at, &snapshots)).await;
        match written {
            Ok(Ok(path)) => report.batch_path = path,
            Ok(Err(e)) => {
                error!(error = %e, records = report.snapshots_collected, "Failed to persist cycle batch");
                report.errors.push(CycleError::Storage(e));
            }
            Err(e) => {
                error!(error = %e, records = report.snapshots_collected, "Batch write task failed");
                report.errors.push(CycleError::WriteTask(e));
            }
        }

        info!(
            cycle_at = %cycle_at,
            succeeded = report.accounts_succeeded,
            failed = report.accounts_total - report.accounts_succeeded,
            snapshots = report.snapshots_collected,
            "Ingestion cycle finished"
        );
        report
    }

    /// Fetches the full listing of one account, restarting from the first
    /// page on every retry.
    async fn fetch_account(&self, account: &Account) -> Result<Vec<VideoEntry>, CycleError> {
        let mut pages = ListingPages::new(self.source.as_ref(), account.id.clone(), self.policy.page_size)
            .with_page_delay(self.policy.page_delay)
            .with_max_pages(self.policy.max_pages);

        let mut attempt = 0;
        loop {
            attempt += 1;
            pages.restart();

            match drain(&mut pages).await {
                Ok(entries) => return Ok(entries),
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    warn!(
                        account_id = %account.id,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Account fetch failed, retrying"
                    );
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
                Err(source) => {
                    return Err(CycleError::Upstream {
                        account_id: account.id.clone(),
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}

async fn drain<S: VideoSource + ?Sized>(
    pages: &mut ListingPages<'_, S>,
) -> playwatch_haokan::Result<Vec<VideoEntry>> {
    let mut entries = Vec::new();
    while let Some(page) = pages.next_page().await? {
        entries.extend(page.entries);
    }
    Ok(entries)
}

#[async_trait]
impl<S, C> CycleRunner for Ingestor<S, C>
where
    S: VideoSource + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    async fn run_cycle(&self) -> CycleReport {
        Ingestor::run_cycle(self).await
    }
}
