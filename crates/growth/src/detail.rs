//! Per-account detail view.

use crate::growth::VideoGrowth;
use crate::rollup::GrowthTotals;
use crate::timeline::group_by_identity;
use playwatch_data::{Account, Snapshot};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetail {
    pub info: AccountInfo,
    pub stats: GrowthTotals,
    /// Newest publication first.
    pub videos: Vec<VideoGrowth>,
}

/// Growth for the videos of one account.
///
/// Only snapshots captured under `account_id` are considered. The name comes
/// from the directory; an account missing from it is shown under its id.
pub fn account_detail(
    accounts: &[Account],
    snapshots: impl IntoIterator<Item = Snapshot>,
    account_id: &str,
) -> AccountDetail {
    let name = accounts
        .iter()
        .find(|a| a.id == account_id)
        .map_or_else(|| account_id.to_string(), Account::name_or_default);

    let mut videos: Vec<VideoGrowth> = group_by_identity(
        snapshots
            .into_iter()
            .filter(|s| s.account_id == account_id),
    )
    .iter()
    .map(VideoGrowth::from_timeline)
    .collect();
    videos.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));

    AccountDetail {
        info: AccountInfo {
            id: account_id.to_string(),
            name,
        },
        stats: GrowthTotals::from_videos(&videos),
        videos,
    }
}
