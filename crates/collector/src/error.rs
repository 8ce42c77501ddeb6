use playwatch_data::StorageError;
use playwatch_haokan::HaokanError;
use thiserror::Error;
use tokio::task::JoinError;

/// A failure recorded during one ingestion cycle.
///
/// Cycles never abort on these; they are collected in the
/// [`CycleReport`](crate::CycleReport).
#[derive(Debug, Error)]
pub enum CycleError {
    /// An account could not be fetched within the attempt budget.
    #[error("account {account_id} abandoned after {attempts} attempt(s): {source}")]
    Upstream {
        account_id: String,
        attempts: u32,
        #[source]
        source: HaokanError,
    },

    /// The cycle's batch could not be written.
    #[error("batch write failed: {0}")]
    Storage(#[from] StorageError),

    /// The blocking batch write panicked or was cancelled.
    #[error("batch write task failed: {0}")]
    WriteTask(#[from] JoinError),
}

impl CycleError {
    /// Account the failure belongs to, if any.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Self::Upstream { account_id, .. } => Some(account_id),
            Self::Storage(_) | Self::WriteTask(_) => None,
        }
    }
}
