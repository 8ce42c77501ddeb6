//! Snapshot record: one observation of one video at one poll time.

use super::serde_helpers::{captured_at, lenient_string};
use crate::play_count::parse_play_count;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of a video's play count and metadata.
///
/// Snapshots are produced by ingestion and never modified afterwards.
/// Field aliases keep batches written by older deployments readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Platform video identifier; may be empty on degraded records.
    #[serde(default, alias = "vid", deserialize_with = "lenient_string")]
    pub video_id: String,
    /// Owning account at capture time.
    #[serde(default, alias = "app_id", deserialize_with = "lenient_string")]
    pub account_id: String,
    /// Account display name at capture time.
    #[serde(default, alias = "author_name", deserialize_with = "lenient_string")]
    pub account_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub publish_time: String,
    /// Raw play count as reported upstream (see [`parse_play_count`]).
    #[serde(default, deserialize_with = "lenient_string")]
    pub play_count: String,
    /// Human-readable play count, e.g. `12.3万次播放`.
    #[serde(default, alias = "play_count_text", deserialize_with = "lenient_string")]
    pub display_play_count_text: String,
    /// Ingestion cycle time (collection clock, second resolution).
    #[serde(alias = "crawl_time", with = "captured_at")]
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot with empty descriptive fields.
    pub fn new(
        video_id: impl Into<String>,
        account_id: impl Into<String>,
        play_count: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            account_id: account_id.into(),
            account_name: String::new(),
            title: String::new(),
            publish_time: String::new(),
            play_count: play_count.into(),
            display_play_count_text: String::new(),
            captured_at,
        }
    }

    /// Builder method to set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder method to set the publish time.
    #[must_use]
    pub fn with_publish_time(mut self, publish_time: impl Into<String>) -> Self {
        self.publish_time = publish_time.into();
        self
    }

    /// Builder method to set the account display name.
    #[must_use]
    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = name.into();
        self
    }

    /// Builder method to set the display text.
    #[must_use]
    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_play_count_text = text.into();
        self
    }

    /// Key used to group snapshots of one logical video.
    ///
    /// Falls back to the title when the video id is missing, which can merge
    /// distinct videos sharing a title.
    #[must_use]
    pub fn identity_key(&self) -> &str {
        if self.video_id.is_empty() {
            &self.title
        } else {
            &self.video_id
        }
    }

    /// Parsed play count.
    #[must_use]
    pub fn plays(&self) -> i64 {
        parse_play_count(&self.play_count)
    }
}
