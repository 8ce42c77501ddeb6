//! Snapshot ingestion for tracked creator accounts.
//!
//! An [`Ingestor`] runs one cycle: it walks every account in the directory,
//! retries failed accounts, and appends one batch to the store.
//! [`IngestionScheduler`] repeats cycles on a cron schedule, and
//! [`trigger_cycle`] runs one in the background on demand.

pub mod bootstrap;
pub mod error;
pub mod ingestor;
pub mod report;
pub mod scheduler;

pub use bootstrap::{bootstrap_directory, resolve_account_names};
pub use error::CycleError;
pub use ingestor::{trigger_cycle, CycleRunner, IngestionPolicy, Ingestor};
pub use report::CycleReport;
pub use scheduler::IngestionScheduler;
