//! Per-video growth figures derived from a timeline.

use crate::timeline::{ReferencePoints, VideoTimeline};
use chrono::{DateTime, Utc};
use playwatch_data::models::serde_helpers::captured_at;
use playwatch_data::Snapshot;
use serde::Serialize;

/// Parsed play counts of the selected reference snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReferencePlays {
    pub hour: Option<i64>,
    pub day: Option<i64>,
    pub two_day: Option<i64>,
    pub week: Option<i64>,
    pub month: Option<i64>,
}

impl From<ReferencePoints<'_>> for ReferencePlays {
    fn from(refs: ReferencePoints<'_>) -> Self {
        Self {
            hour: refs.hour.map(Snapshot::plays),
            day: refs.day.map(Snapshot::plays),
            two_day: refs.two_day.map(Snapshot::plays),
            week: refs.week.map(Snapshot::plays),
            month: refs.month.map(Snapshot::plays),
        }
    }
}

/// Growth record of one video. Derived on every query, never persisted.
///
/// Descriptive fields come from the latest snapshot. Growth fields are `None`
/// when the window has no reference; they serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoGrowth {
    pub identity_key: String,
    pub video_id: String,
    pub account_id: String,
    pub title: String,
    pub publish_time: String,
    pub play_count: i64,
    pub play_count_text: String,
    #[serde(with = "captured_at")]
    pub captured_at: DateTime<Utc>,
    pub hour_growth: Option<i64>,
    pub day_growth: Option<i64>,
    pub yesterday_growth: Option<i64>,
    pub references: ReferencePlays,
}

impl VideoGrowth {
    /// Computes growth for a timeline.
    ///
    /// Deltas are plain differences and may be negative. They saturate at the
    /// `i64` bounds instead of overflowing.
    #[must_use]
    pub fn from_timeline(timeline: &VideoTimeline) -> Self {
        let latest = timeline.latest();
        let plays = latest.plays();
        let references = ReferencePlays::from(timeline.references());

        Self {
            identity_key: timeline.key().to_string(),
            video_id: latest.video_id.clone(),
            account_id: latest.account_id.clone(),
            title: latest.title.clone(),
            publish_time: latest.publish_time.clone(),
            play_count: plays,
            play_count_text: latest.display_play_count_text.clone(),
            captured_at: latest.captured_at,
            hour_growth: references.hour.map(|r| plays.saturating_sub(r)),
            day_growth: references.day.map(|r| plays.saturating_sub(r)),
            yesterday_growth: references
                .day
                .zip(references.two_day)
                .map(|(day, two_day)| day.saturating_sub(two_day)),
            references,
        }
    }
}

impl From<&VideoTimeline> for VideoGrowth {
    fn from(timeline: &VideoTimeline) -> Self {
        Self::from_timeline(timeline)
    }
}
