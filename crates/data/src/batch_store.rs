//! Append-only snapshot batch storage.
//!
//! Every ingestion cycle writes one immutable `crawl_<timestamp>_<suffix>.json`
//! file holding a JSON array of [`Snapshot`]s. Readers merge all batches (plus
//! the optional legacy single-file store) on every query.
//!
//! # Example
//!
//! ```ignore
//! use playwatch_data::BatchStore;
//!
//! let store = BatchStore::new("data").with_legacy_file("data/records.json");
//! let path = store.write_batch(cycle_at, &snapshots)?;
//! let everything = store.load_all();
//! ```

use crate::atomic::write_json_atomic;
use crate::error::StorageError;
use crate::models::Snapshot;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BATCH_PREFIX: &str = "crawl_";
const BATCH_SUFFIX: &str = ".json";

/// Contents of one batch file after lenient decoding.
#[derive(Debug, Clone, Default)]
pub struct BatchContents {
    pub snapshots: Vec<Snapshot>,
    /// Records that were present but could not be decoded.
    pub skipped_records: usize,
}

/// Flat-file store of snapshot batches.
#[derive(Debug, Clone)]
pub struct BatchStore {
    data_dir: PathBuf,
    legacy_file: Option<PathBuf>,
}

impl BatchStore {
    /// Creates a store rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            legacy_file: None,
        }
    }

    /// Also reads snapshots from a legacy single-file store.
    #[must_use]
    pub fn with_legacy_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File name for a batch captured at `cycle_at`.
    ///
    /// The random suffix keeps concurrent cycles that share a second apart.
    #[must_use]
    pub fn batch_file_name(cycle_at: DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "{BATCH_PREFIX}{}_{}{BATCH_SUFFIX}",
            cycle_at.format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        )
    }

    fn is_batch_file(name: &str) -> bool {
        name.starts_with(BATCH_PREFIX) && name.ends_with(BATCH_SUFFIX)
    }

    /// Writes one cycle's snapshots as a new batch.
    ///
    /// Returns `Ok(None)` without touching the disk when `snapshots` is empty.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn write_batch(
        &self,
        cycle_at: DateTime<Utc>,
        snapshots: &[Snapshot],
    ) -> Result<Option<PathBuf>, StorageError> {
        if snapshots.is_empty() {
            debug!("Empty cycle, no batch written");
            return Ok(None);
        }

        let path = self.data_dir.join(Self::batch_file_name(cycle_at));
        write_json_atomic(&path, snapshots)?;

        info!(
            path = %path.display(),
            records = snapshots.len(),
            "Wrote snapshot batch"
        );
        Ok(Some(path))
    }

    /// Lists batch files in name (capture time) order.
    ///
    /// # Errors
    /// Returns an error if the data directory exists but cannot be listed.
    pub fn batch_paths(&self) -> Result<Vec<PathBuf>, StorageError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.data_dir, e)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| Self::is_batch_file(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Reads one batch file, skipping records that fail to decode.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not JSON, or is not an array.
    pub fn read_batch(path: &Path) -> Result<BatchContents, StorageError> {
        let text = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| StorageError::json(path, e))?;

        let Value::Array(records) = value else {
            return Err(StorageError::Layout {
                path: path.to_path_buf(),
                reason: "expected a JSON array of snapshots".to_string(),
            });
        };

        let mut contents = BatchContents::default();
        for record in records {
            match serde_json::from_value::<Snapshot>(record) {
                Ok(snapshot) => contents.snapshots.push(snapshot),
                Err(_) => contents.skipped_records += 1,
            }
        }

        if contents.skipped_records > 0 {
            warn!(
                path = %path.display(),
                skipped = contents.skipped_records,
                "Skipped undecodable snapshot records"
            );
        }
        Ok(contents)
    }

    /// Returns every snapshot across all batches, in no particular order.
    ///
    /// Unreadable batches are logged and skipped; partial data beats none.
    #[must_use]
    pub fn load_all(&self) -> Vec<Snapshot> {
        let mut sources = Vec::new();
        if let Some(legacy) = self.legacy_file.as_ref().filter(|p| p.exists()) {
            sources.push(legacy.clone());
        }
        match self.batch_paths() {
            Ok(paths) => sources.extend(paths),
            Err(e) => warn!(error = %e, "Failed to list snapshot batches"),
        }

        let mut snapshots = Vec::new();
        for path in &sources {
            match Self::read_batch(path) {
                Ok(contents) => snapshots.extend(contents.snapshots),
                Err(e) => warn!(error = %e, "Skipping unreadable snapshot batch"),
            }
        }

        debug!(
            batches = sources.len(),
            records = snapshots.len(),
            "Loaded snapshots"
        );
        snapshots
    }

    /// Returns at most `limit` raw snapshots. Ordering is not guaranteed.
    #[must_use]
    pub fn list(&self, limit: usize) -> Vec<Snapshot> {
        let mut snapshots = self.load_all();
        snapshots.truncate(limit);
        snapshots
    }
}
