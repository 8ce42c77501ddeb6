//! Account and global rollups for the dashboard.

use crate::growth::VideoGrowth;
use crate::timeline::group_by_identity;
use playwatch_data::{Account, Snapshot};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Summed figures over a set of videos. Absent growth contributes nothing;
/// sums saturate at the `i64` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrowthTotals {
    pub video_count: u64,
    pub total_play_count: i64,
    pub hour_growth: i64,
    pub day_growth: i64,
    pub yesterday_growth: i64,
}

impl GrowthTotals {
    pub fn add_video(&mut self, video: &VideoGrowth) {
        self.video_count += 1;
        self.total_play_count = self.total_play_count.saturating_add(video.play_count);
        self.hour_growth = self.hour_growth.saturating_add(video.hour_growth.unwrap_or(0));
        self.day_growth = self.day_growth.saturating_add(video.day_growth.unwrap_or(0));
        self.yesterday_growth = self
            .yesterday_growth
            .saturating_add(video.yesterday_growth.unwrap_or(0));
    }

    pub fn absorb(&mut self, other: &Self) {
        self.video_count += other.video_count;
        self.total_play_count = self.total_play_count.saturating_add(other.total_play_count);
        self.hour_growth = self.hour_growth.saturating_add(other.hour_growth);
        self.day_growth = self.day_growth.saturating_add(other.day_growth);
        self.yesterday_growth = self.yesterday_growth.saturating_add(other.yesterday_growth);
    }

    /// Totals over `videos`.
    pub fn from_videos<'a>(videos: impl IntoIterator<Item = &'a VideoGrowth>) -> Self {
        let mut totals = Self::default();
        for video in videos {
            totals.add_video(video);
        }
        totals
    }
}

/// Dashboard row for one configured account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub account_id: String,
    pub name: String,
    #[serde(flatten)]
    pub totals: GrowthTotals,
}

/// Workspace-wide figures.
///
/// `yesterday_total`, `last_week_total` and `last_month_total` sum the
/// reference play counts of the day, week and month windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    #[serde(flatten)]
    pub totals: GrowthTotals,
    pub yesterday_total: i64,
    pub last_week_total: i64,
    pub last_month_total: i64,
}

impl GlobalStats {
    fn add_references(&mut self, video: &VideoGrowth) {
        let refs = &video.references;
        self.yesterday_total = self.yesterday_total.saturating_add(refs.day.unwrap_or(0));
        self.last_week_total = self.last_week_total.saturating_add(refs.week.unwrap_or(0));
        self.last_month_total = self.last_month_total.saturating_add(refs.month.unwrap_or(0));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub global: GlobalStats,
    pub accounts: Vec<AccountStats>,
}

/// Computes the dashboard over every snapshot.
///
/// A video belongs to the account named by its latest snapshot. Videos of
/// accounts missing from `accounts` are left out of every figure, and each
/// directory entry gets a row even when it has no videos.
pub fn dashboard_stats(
    accounts: &[Account],
    snapshots: impl IntoIterator<Item = Snapshot>,
) -> DashboardStats {
    let videos: Vec<VideoGrowth> = group_by_identity(snapshots)
        .iter()
        .map(VideoGrowth::from_timeline)
        .collect();

    let mut by_account: HashMap<&str, Vec<&VideoGrowth>> = HashMap::new();
    for video in &videos {
        by_account
            .entry(video.account_id.as_str())
            .or_default()
            .push(video);
    }

    let mut stats = DashboardStats::default();
    for account in accounts {
        let owned = by_account
            .get(account.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let totals = GrowthTotals::from_videos(owned.iter().copied());
        for video in owned {
            stats.global.add_references(video);
        }
        stats.global.totals.absorb(&totals);
        stats.accounts.push(AccountStats {
            account_id: account.id.clone(),
            name: account.name_or_default(),
            totals,
        });
    }

    debug!(
        videos = videos.len(),
        accounts = stats.accounts.len(),
        counted = stats.global.totals.video_count,
        "Computed dashboard stats"
    );
    stats
}
