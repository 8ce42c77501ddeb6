//! The tracked-account directory (a small JSON file maintained by operators).
//!
//! Two layouts are accepted: a list of `{"id": .., "name": ..}` objects, and
//! the older bare list of ids, which maps to accounts with placeholder names.
//! Writes always replace the whole file.

use crate::atomic::write_json_atomic;
use crate::error::{DirectoryError, StorageError};
use crate::models::Account;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AccountDirectory {
    path: PathBuf,
}

impl AccountDirectory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the directory.
    ///
    /// # Errors
    /// Returns `DirectoryError::NotFound` if the file is missing, or
    /// `DirectoryError::Malformed` if it cannot be read or decoded.
    pub fn load(&self) -> Result<Vec<Account>, DirectoryError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DirectoryError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(StorageError::io(&self.path, e).into()),
        };
        let value: Value =
            serde_json::from_str(&text).map_err(|e| StorageError::json(&self.path, e))?;
        Ok(self.decode(value)?)
    }

    fn decode(&self, value: Value) -> Result<Vec<Account>, StorageError> {
        let Value::Array(entries) = value else {
            return Err(self.layout_error("expected a JSON array of accounts"));
        };

        entries
            .into_iter()
            .map(|entry| match entry {
                Value::String(id) => Ok(Account::unnamed(id)),
                Value::Number(id) => Ok(Account::unnamed(id.to_string())),
                Value::Object(_) => {
                    serde_json::from_value(entry).map_err(|e| StorageError::json(&self.path, e))
                }
                other => Err(self.layout_error(&format!("unsupported account entry: {other}"))),
            })
            .collect()
    }

    fn layout_error(&self, reason: &str) -> StorageError {
        StorageError::Layout {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    /// Loads the directory, degrading to "no accounts configured" on any error.
    #[must_use]
    pub fn load_or_empty(&self) -> Vec<Account> {
        match self.load() {
            Ok(accounts) => accounts,
            Err(DirectoryError::NotFound(path)) => {
                info!(path = %path.display(), "No account directory found, no accounts configured");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load account directory, no accounts configured");
                Vec::new()
            }
        }
    }

    /// Replaces the whole directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn replace(&self, accounts: &[Account]) -> Result<(), StorageError> {
        write_json_atomic(&self.path, accounts)?;
        info!(
            path = %self.path.display(),
            accounts = accounts.len(),
            "Account directory replaced"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn directory() -> (TempDir, AccountDirectory) {
        let dir = TempDir::new().unwrap();
        let directory = AccountDirectory::new(dir.path().join("config").join("accounts.json"));
        (dir, directory)
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, directory) = directory();
        assert!(matches!(directory.load(), Err(DirectoryError::NotFound(_))));
        assert!(directory.load_or_empty().is_empty());
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let (_dir, directory) = directory();
        fs::create_dir_all(directory.path().parent().unwrap()).unwrap();
        fs::write(directory.path(), "{oops").unwrap();
        assert!(matches!(directory.load(), Err(DirectoryError::Malformed(_))));
        assert!(directory.load_or_empty().is_empty());
    }

    #[test]
    fn test_legacy_id_list() {
        let (_dir, directory) = directory();
        fs::create_dir_all(directory.path().parent().unwrap()).unwrap();
        fs::write(directory.path(), r#"["111", 222]"#).unwrap();

        let accounts = directory.load().unwrap();
        assert_eq!(
            accounts,
            vec![Account::new("111", "user_111"), Account::new("222", "user_222")]
        );
    }

    #[test]
    fn test_replace_then_load() {
        let (_dir, directory) = directory();
        let accounts = vec![Account::new("1", "First"), Account::new("2", "Second")];
        directory.replace(&accounts).unwrap();
        assert_eq!(directory.load().unwrap(), accounts);

        directory.replace(&accounts[..1]).unwrap();
        assert_eq!(directory.load().unwrap(), accounts[..1].to_vec());
    }
}
