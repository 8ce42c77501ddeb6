//! Growth windows and their reference-selection thresholds.
//!
//! Polls run roughly hourly, so a window's threshold sits below its nominal
//! length: the reference for "one hour ago" is the newest snapshot at least
//! 50 minutes older than the latest one.

use chrono::Duration;
use serde::Serialize;

/// A look-back window used to pick a reference snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthWindow {
    Hour,
    Day,
    TwoDay,
    Week,
    Month,
}

impl GrowthWindow {
    pub const ALL: [Self; 5] = [Self::Hour, Self::Day, Self::TwoDay, Self::Week, Self::Month];

    /// Minimum age (seconds before latest) a reference snapshot must have.
    #[must_use]
    pub const fn min_age_secs(self) -> i64 {
        match self {
            Self::Hour => 3_000,
            Self::Day => 80_000,
            Self::TwoDay => 166_000,
            Self::Week => 600_000,
            Self::Month => 2_500_000,
        }
    }

    #[must_use]
    pub fn min_age(self) -> Duration {
        Duration::seconds(self.min_age_secs())
    }

    /// Nominal window length in seconds.
    #[must_use]
    pub const fn nominal_secs(self) -> i64 {
        match self {
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::TwoDay => 172_800,
            Self::Week => 604_800,
            Self::Month => 2_592_000,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::TwoDay => "two_day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::fmt::Display for GrowthWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
