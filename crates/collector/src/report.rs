use crate::error::CycleError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Outcome of one ingestion cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// Timestamp stamped on every snapshot of the cycle.
    pub cycle_at: DateTime<Utc>,
    pub accounts_total: usize,
    pub accounts_succeeded: usize,
    pub snapshots_collected: usize,
    /// Written batch, `None` when nothing was collected or the write failed.
    pub batch_path: Option<PathBuf>,
    pub errors: Vec<CycleError>,
}

impl CycleReport {
    #[must_use]
    pub fn new(cycle_at: DateTime<Utc>, accounts_total: usize) -> Self {
        Self {
            cycle_at,
            accounts_total,
            accounts_succeeded: 0,
            snapshots_collected: 0,
            batch_path: None,
            errors: Vec::new(),
        }
    }

    /// True when every account was fetched and the batch (if any) persisted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ids of accounts abandoned this cycle.
    pub fn failed_accounts(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().filter_map(CycleError::account_id)
    }

    #[must_use]
    pub fn storage_failed(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, CycleError::Storage(_) | CycleError::WriteTask(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use playwatch_haokan::HaokanError;

    #[test]
    fn test_failed_accounts() {
        let mut report = CycleReport::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), 2);
        assert!(report.is_clean());

        report.errors.push(CycleError::Upstream {
            account_id: "b".to_string(),
            attempts: 3,
            source: HaokanError::Network("reset".to_string()),
        });
        assert!(!report.is_clean());
        assert!(!report.storage_failed());
        assert_eq!(report.failed_accounts().collect::<Vec<_>>(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_failed_write_task_counts_as_storage_failure() {
        let join_error = tokio::spawn(async { panic!("disk gone") }).await.unwrap_err();

        let mut report = CycleReport::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), 1);
        report.errors.push(CycleError::WriteTask(join_error));
        assert!(report.storage_failed());
        assert_eq!(report.failed_accounts().count(), 0);
    }
}
