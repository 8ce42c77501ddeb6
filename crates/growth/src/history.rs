//! Per-video play-count history.

use crate::timeline::IdentityResolver;
use chrono::{DateTime, Utc};
use playwatch_data::models::serde_helpers::captured_at;
use playwatch_data::Snapshot;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPoint {
    #[serde(with = "captured_at")]
    pub captured_at: DateTime<Utc>,
    pub play_count: i64,
    pub display_text: String,
}

impl From<&Snapshot> for HistoryPoint {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            captured_at: snapshot.captured_at,
            play_count: snapshot.plays(),
            display_text: snapshot.display_play_count_text.clone(),
        }
    }
}

/// Every observation of the video known as `key`, oldest first.
///
/// `key` matches either the video id or the title, so degraded records keyed
/// by title are found as well. Title-only records that resolve to a video id
/// (see [`IdentityResolver`]) are found by that id. An empty key matches nothing.
pub fn video_history(snapshots: impl IntoIterator<Item = Snapshot>, key: &str) -> Vec<HistoryPoint> {
    if key.is_empty() {
        return Vec::new();
    }

    let snapshots: Vec<Snapshot> = snapshots.into_iter().collect();
    let resolver = IdentityResolver::new(&snapshots);

    let mut points: Vec<HistoryPoint> = snapshots
        .iter()
        .filter(|s| resolver.resolve(s) == key || s.title == key)
        .map(HistoryPoint::from)
        .collect();
    points.sort_by_key(|p| p.captured_at);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    #[test]
    fn test_history_is_ascending() {
        let snapshots = vec![
            Snapshot::new("v1", "a", "30", at(3)),
            Snapshot::new("v2", "a", "99", at(2)),
            Snapshot::new("v1", "a", "10", at(1)).with_display_text("10次播放"),
            Snapshot::new("v1", "a", "1.2万", at(2)),
        ];

        let history = video_history(snapshots, "v1");
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].captured_at <= w[1].captured_at));
        assert_eq!(history[0].display_text, "10次播放");
        assert_eq!(history[1].play_count, 12_000);
    }

    #[test]
    fn test_title_key_matches_degraded_records() {
        let snapshots = vec![
            Snapshot::new("", "a", "1", at(0)).with_title("Launch"),
            Snapshot::new("", "a", "2", at(1)).with_title("Launch"),
            Snapshot::new("", "a", "3", at(1)).with_title("Other"),
        ];
        assert_eq!(video_history(snapshots, "Launch").len(), 2);
    }

    #[test]
    fn test_id_key_finds_title_only_records_of_that_video() {
        let snapshots = vec![
            Snapshot::new("", "a", "100", at(0)).with_title("Launch"),
            Snapshot::new("v1", "a", "150", at(1)).with_title("Launch"),
        ];
        let plays: Vec<_> = video_history(snapshots, "v1")
            .iter()
            .map(|p| p.play_count)
            .collect();
        assert_eq!(plays, vec![100, 150]);
    }

    #[test]
    fn test_unknown_or_empty_key() {
        let snapshots = vec![Snapshot::new("", "a", "1", at(0))];
        assert!(video_history(snapshots.clone(), "").is_empty());
        assert!(video_history(snapshots, "missing").is_empty());
    }

    #[test]
    fn test_serialized_point() {
        let point = HistoryPoint::from(&Snapshot::new("v", "a", "5", at(0)));
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["captured_at"], "2024-06-01T00:00:00Z");
        assert_eq!(json["play_count"], 5);
    }
}
