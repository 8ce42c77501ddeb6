//! Growth aggregation over play-count snapshots.
//!
//! Snapshots are grouped per video, reference snapshots are picked for a set
//! of look-back windows, and the resulting deltas are rolled up per account
//! and globally. All functions are pure over their inputs; [`StatsQueries`]
//! binds them to the on-disk store.

pub mod detail;
pub mod growth;
pub mod history;
pub mod queries;
pub mod rollup;
pub mod timeline;
pub mod window;

pub use detail::{account_detail, AccountDetail, AccountInfo};
pub use growth::{ReferencePlays, VideoGrowth};
pub use history::{video_history, HistoryPoint};
pub use queries::StatsQueries;
pub use rollup::{dashboard_stats, AccountStats, DashboardStats, GlobalStats, GrowthTotals};
pub use timeline::{group_by_identity, IdentityResolver, ReferencePoints, VideoTimeline};
pub use window::GrowthWindow;
