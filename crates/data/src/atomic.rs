//! Write-then-rename helper so readers never observe a half-written file.

use crate::error::StorageError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serializes `value` as pretty JSON into `path` atomically.
///
/// The payload goes to a hidden temp file in the same directory, is synced,
/// then renamed over the target.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    fs::create_dir_all(&parent).map_err(|e| StorageError::io(&parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()));

    let result = write_and_sync(&tmp_path, value).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_sync<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StorageError::json(path, e))?;
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| StorageError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| StorageError::io(path, e))
}
