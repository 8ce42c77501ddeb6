//! Per-video snapshot timelines and reference-point selection.

use crate::window::GrowthWindow;
use chrono::Duration;
use playwatch_data::Snapshot;
use std::collections::{BTreeMap, HashMap};

/// All snapshots of one logical video, newest first.
///
/// Never empty. Snapshots with equal `captured_at` keep their load order, so
/// the first one loaded wins the "latest" slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTimeline {
    key: String,
    snapshots: Vec<Snapshot>,
}

impl VideoTimeline {
    /// Builds a timeline, or `None` when there is nothing to order.
    #[must_use]
    pub fn new(key: impl Into<String>, mut snapshots: Vec<Snapshot>) -> Option<Self> {
        if snapshots.is_empty() {
            return None;
        }
        snapshots.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Some(Self {
            key: key.into(),
            snapshots,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn latest(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    /// Snapshots ordered by `captured_at` descending.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// How far `snapshot` lies behind the latest observation.
    #[must_use]
    pub fn age_of(&self, snapshot: &Snapshot) -> Duration {
        self.latest().captured_at - snapshot.captured_at
    }

    /// Youngest snapshot at least `window.min_age()` older than the latest.
    #[must_use]
    pub fn reference(&self, window: GrowthWindow) -> Option<&Snapshot> {
        let min_age = window.min_age();
        self.snapshots.iter().find(|s| self.age_of(s) >= min_age)
    }

    /// References for every window.
    #[must_use]
    pub fn references(&self) -> ReferencePoints<'_> {
        ReferencePoints {
            hour: self.reference(GrowthWindow::Hour),
            day: self.reference(GrowthWindow::Day),
            two_day: self.reference(GrowthWindow::TwoDay),
            week: self.reference(GrowthWindow::Week),
            month: self.reference(GrowthWindow::Month),
        }
    }
}

/// Selected reference snapshot per window; `None` when no snapshot is old enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferencePoints<'a> {
    pub hour: Option<&'a Snapshot>,
    pub day: Option<&'a Snapshot>,
    pub two_day: Option<&'a Snapshot>,
    pub week: Option<&'a Snapshot>,
    pub month: Option<&'a Snapshot>,
}

impl<'a> ReferencePoints<'a> {
    #[must_use]
    pub fn get(&self, window: GrowthWindow) -> Option<&'a Snapshot> {
        match window {
            GrowthWindow::Hour => self.hour,
            GrowthWindow::Day => self.day,
            GrowthWindow::TwoDay => self.two_day,
            GrowthWindow::Week => self.week,
            GrowthWindow::Month => self.month,
        }
    }
}

/// Maps snapshots to the key of the logical video they belong to.
///
/// Records written before video ids were stored carry only a title. Such a
/// record joins the video of the same account and title when exactly one
/// video id is known for that pair; otherwise it stays keyed by title.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    /// account id -> title -> sole video id, `None` when ambiguous.
    ids_by_title: HashMap<String, HashMap<String, Option<String>>>,
}

impl IdentityResolver {
    pub fn new<'a>(snapshots: impl IntoIterator<Item = &'a Snapshot>) -> Self {
        let mut ids_by_title: HashMap<String, HashMap<String, Option<String>>> = HashMap::new();
        for snapshot in snapshots {
            if snapshot.video_id.is_empty() || snapshot.title.is_empty() {
                continue;
            }
            let known = ids_by_title
                .entry(snapshot.account_id.clone())
                .or_default()
                .entry(snapshot.title.clone())
                .or_insert_with(|| Some(snapshot.video_id.clone()));
            if known.as_deref().is_some_and(|id| id != snapshot.video_id) {
                *known = None;
            }
        }
        Self { ids_by_title }
    }

    /// Identity key of `snapshot`.
    #[must_use]
    pub fn resolve<'a>(&'a self, snapshot: &'a Snapshot) -> &'a str {
        if !snapshot.video_id.is_empty() {
            return &snapshot.video_id;
        }
        self.ids_by_title
            .get(&snapshot.account_id)
            .and_then(|titles| titles.get(&snapshot.title))
            .and_then(Option::as_deref)
            .unwrap_or_else(|| snapshot.identity_key())
    }
}

/// Partitions snapshots by identity key into timelines ordered by key.
///
/// Title-keyed records are folded into their video as described on
/// [`IdentityResolver`].
pub fn group_by_identity(snapshots: impl IntoIterator<Item = Snapshot>) -> Vec<VideoTimeline> {
    let snapshots: Vec<Snapshot> = snapshots.into_iter().collect();
    let resolver = IdentityResolver::new(&snapshots);

    let keys: Vec<String> = snapshots
        .iter()
        .map(|s| resolver.resolve(s).to_string())
        .collect();

    let mut groups: BTreeMap<String, Vec<Snapshot>> = BTreeMap::new();
    for (key, snapshot) in keys.into_iter().zip(snapshots) {
        groups.entry(key).or_default().push(snapshot);
    }

    groups
        .into_iter()
        .filter_map(|(key, snapshots)| VideoTimeline::new(key, snapshots))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    /// Snapshot of `v1` taken `age_secs` before [`base`].
    fn aged(age_secs: i64, plays: &str) -> Snapshot {
        Snapshot::new("v1", "acc", plays, base() - Duration::seconds(age_secs))
    }

    fn timeline(snapshots: Vec<Snapshot>) -> VideoTimeline {
        VideoTimeline::new("v1", snapshots).unwrap()
    }

    #[test]
    fn test_empty_group_has_no_timeline() {
        assert!(VideoTimeline::new("v1", vec![]).is_none());
    }

    #[test]
    fn test_latest_is_newest_regardless_of_input_order() {
        let t = timeline(vec![aged(7200, "1"), aged(0, "3"), aged(3600, "2")]);
        assert_eq!(t.latest().play_count, "3");
        let ages: Vec<_> = t.snapshots().iter().map(|s| t.age_of(s).num_seconds()).collect();
        assert_eq!(ages, vec![0, 3600, 7200]);
    }

    #[test]
    fn test_reference_is_youngest_meeting_threshold() {
        let t = timeline(vec![
            aged(0, "500"),
            aged(2999, "450"),
            aged(3000, "400"),
            aged(3600, "300"),
            aged(90_000, "100"),
        ]);

        let hour = t.reference(GrowthWindow::Hour).unwrap();
        assert_eq!(t.age_of(hour).num_seconds(), 3000);

        let day = t.reference(GrowthWindow::Day).unwrap();
        assert_eq!(t.age_of(day).num_seconds(), 90_000);

        assert!(t.reference(GrowthWindow::TwoDay).is_none());
    }

    #[test]
    fn test_every_selected_reference_satisfies_its_bound() {
        let ages = [0, 1800, 3500, 50_000, 81_000, 170_000, 650_000, 2_600_000];
        let t = timeline(ages.iter().map(|a| aged(*a, "1")).collect());

        for window in GrowthWindow::ALL {
            let reference = t.reference(window).unwrap();
            let age = t.age_of(reference).num_seconds();
            assert!(age >= window.min_age_secs(), "{window}");
            // no younger snapshot also qualifies
            assert!(t
                .snapshots()
                .iter()
                .map(|s| t.age_of(s).num_seconds())
                .filter(|a| *a >= window.min_age_secs())
                .all(|a| a >= age));
        }
    }

    #[test]
    fn test_single_snapshot_has_no_references() {
        let t = timeline(vec![aged(0, "10")]);
        assert_eq!(t.references(), ReferencePoints::default());
    }

    #[test]
    fn test_tie_keeps_first_loaded_as_latest() {
        let t = timeline(vec![aged(0, "first"), aged(0, "second")]);
        assert_eq!(t.latest().play_count, "first");
    }

    #[test]
    fn test_title_keyed_record_joins_its_video() {
        let snapshots = vec![
            Snapshot::new("", "acc", "100", base() - Duration::hours(1)).with_title("T"),
            Snapshot::new("v1", "acc", "150", base()).with_title("T"),
        ];

        let groups = group_by_identity(snapshots);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key(), "v1");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].reference(GrowthWindow::Hour).unwrap().play_count, "100");
    }

    #[test]
    fn test_title_keyed_record_stays_apart_when_ambiguous() {
        let at = base();
        let snapshots = vec![
            Snapshot::new("", "acc", "1", at).with_title("T"),
            Snapshot::new("v1", "acc", "2", at).with_title("T"),
            Snapshot::new("v2", "acc", "3", at).with_title("T"),
            // same title under another account does not count
            Snapshot::new("v9", "other", "4", at).with_title("Solo"),
            Snapshot::new("", "acc", "5", at).with_title("Solo"),
        ];

        let groups = group_by_identity(snapshots);
        let keys: Vec<_> = groups.iter().map(VideoTimeline::key).collect();
        assert_eq!(keys, vec!["Solo", "T", "v1", "v2", "v9"]);
    }

    #[test]
    fn test_group_by_identity_uses_title_fallback() {
        let at = base();
        let snapshots = vec![
            Snapshot::new("b", "acc", "1", at),
            Snapshot::new("", "acc", "2", at).with_title("untitled"),
            Snapshot::new("a", "acc", "3", at),
            Snapshot::new("b", "acc", "4", at - Duration::hours(1)),
            Snapshot::new("", "acc", "5", at - Duration::hours(1)).with_title("untitled"),
        ];

        let groups = group_by_identity(snapshots);
        let keys: Vec<_> = groups.iter().map(VideoTimeline::key).collect();
        assert_eq!(keys, vec!["a", "b", "untitled"]);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[2].latest().play_count, "2");
    }
}
