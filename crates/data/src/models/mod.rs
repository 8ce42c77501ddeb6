//! Stored data models.

pub mod account;
pub mod serde_helpers;
pub mod snapshot;

pub use account::Account;
pub use serde_helpers::parse_captured_at;
pub use snapshot::Snapshot;
