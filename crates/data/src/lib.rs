//! Data storage and management for the play-count monitor.
//!
//! This crate provides:
//! - Snapshot and account models
//! - Play-count parsing
//! - Append-only JSON batch storage
//! - The account directory file

mod atomic;
pub mod account_directory;
pub mod batch_store;
pub mod error;
pub mod models;
pub mod play_count;

pub use account_directory::AccountDirectory;
pub use batch_store::{BatchContents, BatchStore};
pub use error::{DirectoryError, StorageError};
pub use models::{parse_captured_at, Account, Snapshot};
pub use play_count::parse_play_count;
