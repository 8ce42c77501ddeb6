//! Tracked creator accounts.

use super::serde_helpers::lenient_string;
use serde::{Deserialize, Serialize};

/// Placeholder prefix used by directories migrated before names were resolved.
const LEGACY_PLACEHOLDER_PREFIX: &str = "用户_";

/// A tracked creator account from the account directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "name", default, deserialize_with = "lenient_string")]
    pub display_name: String,
}

impl Account {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Creates an account carrying the placeholder name.
    pub fn unnamed(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = Self::default_name(&id);
        Self { id, display_name }
    }

    /// Placeholder name used until the real display name is resolved.
    #[must_use]
    pub fn default_name(id: &str) -> String {
        format!("user_{id}")
    }

    /// Display name, or the placeholder when none is configured.
    #[must_use]
    pub fn name_or_default(&self) -> String {
        if self.display_name.is_empty() {
            Self::default_name(&self.id)
        } else {
            self.display_name.clone()
        }
    }

    /// True while the account still carries a placeholder (or no) name.
    ///
    /// Both the current `user_<id>` form and the `用户_<id>` form written by
    /// older directory migrations count as placeholders.
    #[must_use]
    pub fn has_placeholder_name(&self) -> bool {
        self.display_name.is_empty()
            || self.display_name == Self::default_name(&self.id)
            || self.display_name == format!("{LEGACY_PLACEHOLDER_PREFIX}{}", self.id)
    }
}
