//! Listing and author-info data models.
//!
//! `Raw*` structs mirror the platform's JSON envelopes; the public types are
//! what the rest of the workspace consumes.

use chrono::{DateTime, Utc};
use playwatch_data::models::serde_helpers::lenient_string;
use playwatch_data::{Account, Snapshot};
use serde::{Deserialize, Serialize};

// =============================================================================
// Public types
// =============================================================================

/// One video as listed on an author page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub video_id: String,
    pub title: String,
    pub publish_time: String,
    /// Raw play count (`playcnt`).
    pub play_count: String,
    /// Display text (`playcntText`).
    pub play_count_text: String,
    pub duration: String,
    pub cover_url: String,
}

impl VideoEntry {
    /// Tags the entry with cycle metadata, producing a storable snapshot.
    #[must_use]
    pub fn into_snapshot(self, account: &Account, captured_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            video_id: self.video_id,
            account_id: account.id.clone(),
            account_name: account.display_name.clone(),
            title: self.title,
            publish_time: self.publish_time,
            play_count: self.play_count,
            display_play_count_text: self.play_count_text,
            captured_at,
        }
    }
}

/// One page of an author's listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<VideoEntry>,
    /// Upstream `has_more` flag.
    pub has_more: bool,
    /// Cursor for the next page (`ctime`).
    pub next_cursor: Option<String>,
    pub response_count: i64,
}

impl ListingPage {
    /// True when no further page should be requested.
    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.has_more || self.entries.is_empty()
    }
}

/// Author profile fields from the author-info endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub avatar_url: String,
    pub follower_count: i64,
}

// =============================================================================
// Raw API types
// =============================================================================

/// Envelope of `/web/author/listall`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawListingResponse {
    #[serde(default = "missing_errno")]
    pub errno: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub errmsg: String,
    #[serde(default)]
    pub data: Option<RawListingData>,
}

fn missing_errno() -> i64 {
    -1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawListingData {
    #[serde(default)]
    pub response_count: i64,
    #[serde(default)]
    pub has_more: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ctime: String,
    #[serde(default)]
    pub results: Vec<RawResultItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawResultItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Option<RawVideoContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawVideoContent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub publish_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcnt: String,
    #[serde(rename = "playcntText", default, deserialize_with = "lenient_string")]
    pub playcnt_text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cover_src: String,
}

impl From<RawVideoContent> for VideoEntry {
    fn from(raw: RawVideoContent) -> Self {
        Self {
            video_id: raw.vid,
            title: raw.title,
            publish_time: raw.publish_time,
            play_count: raw.playcnt,
            play_count_text: raw.playcnt_text,
            duration: raw.duration,
            cover_url: raw.cover_src,
        }
    }
}

impl From<RawListingData> for ListingPage {
    fn from(raw: RawListingData) -> Self {
        let entries: Vec<VideoEntry> = raw
            .results
            .into_iter()
            .filter(|item| item.kind == "video")
            .filter_map(|item| item.content)
            .map(VideoEntry::from)
            .collect();

        Self {
            entries,
            has_more: raw.has_more == 1,
            next_cursor: Some(raw.ctime).filter(|c| !c.is_empty()),
            response_count: raw.response_count,
        }
    }
}

/// Envelope of `/haokan/ui-web/author/info`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawAuthorInfoResponse {
    #[serde(default = "missing_errno")]
    pub status: i64,
    #[serde(default)]
    pub data: Option<RawAuthorInfoData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAuthorInfoData {
    #[serde(default)]
    pub response: Option<RawAuthorResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAuthorResponse {
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub cnt: Option<RawAuthorCounts>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAuthor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author_icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAuthorCounts {
    #[serde(rename = "fansCnt", default)]
    pub fans_cnt: i64,
}

impl From<RawAuthorResponse> for AuthorInfo {
    fn from(raw: RawAuthorResponse) -> Self {
        let author = raw.author.unwrap_or_default();
        Self {
            name: author.author,
            avatar_url: author.author_icon,
            follower_count: raw.cnt.map_or(0, |c| c.fans_cnt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing_json() -> serde_json::Value {
        serde_json::json!({
            "errno": 0,
            "errmsg": "成功",
            "logid": "123",
            "data": {
                "response_count": 3,
                "has_more": 1,
                "ctime": 17000000001u64,
                "results": [
                    {"type": "video", "content": {
                        "vid": "111", "title": "First", "publish_time": "2024-05-01",
                        "playcnt": "2000", "playcntText": "2000次播放"
                    }},
                    {"type": "live", "content": {"vid": "x"}},
                    {"type": "video", "content": {
                        "vid": "222", "title": "Second", "publish_time": "2024-04-01",
                        "playcnt": 150000, "playcntText": "15万次播放", "duration": "03:10"
                    }}
                ]
            }
        })
    }

    #[test]
    fn test_listing_conversion_keeps_only_videos() {
        let raw: RawListingResponse = serde_json::from_value(listing_json()).unwrap();
        assert_eq!(raw.errno, 0);

        let page = ListingPage::from(raw.data.unwrap());
        assert_eq!(page.entries.len(), 2);
        assert!(page.has_more);
        assert!(!page.is_last());
        assert_eq!(page.next_cursor.as_deref(), Some("17000000001"));
        assert_eq!(page.entries[1].play_count, "150000");
        assert_eq!(page.entries[1].duration, "03:10");
    }

    #[test]
    fn test_page_without_videos_is_last() {
        let page = ListingPage {
            entries: vec![],
            has_more: true,
            next_cursor: Some("1".to_string()),
            response_count: 0,
        };
        assert!(page.is_last());
    }

    #[test]
    fn test_missing_errno_is_treated_as_failure() {
        let raw: RawListingResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(raw.errno, -1);
    }

    #[test]
    fn test_author_info_conversion() {
        let raw: RawAuthorInfoResponse = serde_json::from_value(serde_json::json!({
            "status": 0,
            "data": {"response": {
                "author": {"author": "Creator", "author_icon": "https://img/icon.png"},
                "cnt": {"fansCnt": 4321}
            }}
        }))
        .unwrap();

        let info = AuthorInfo::from(raw.data.unwrap().response.unwrap());
        assert_eq!(info.name, "Creator");
        assert_eq!(info.avatar_url, "https://img/icon.png");
        assert_eq!(info.follower_count, 4321);
    }

    #[test]
    fn test_entry_into_snapshot() {
        let entry = VideoEntry {
            video_id: "111".to_string(),
            title: "First".to_string(),
            publish_time: "2024-05-01".to_string(),
            play_count: "2000".to_string(),
            play_count_text: "2000次播放".to_string(),
            duration: String::new(),
            cover_url: String::new(),
        };
        let captured_at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let account = Account::new("acc", "Creator");

        let snapshot = entry.into_snapshot(&account, captured_at);
        assert_eq!(snapshot.video_id, "111");
        assert_eq!(snapshot.account_id, "acc");
        assert_eq!(snapshot.account_name, "Creator");
        assert_eq!(snapshot.plays(), 2000);
        assert_eq!(snapshot.captured_at, captured_at);
    }
}
