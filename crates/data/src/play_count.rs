//! Play-count parsing.
//!
//! The listing API reports play counts as strings. Most are plain integers,
//! but large values sometimes arrive abbreviated with the "ten-thousand"
//! unit (`12.3万`). Everything that does arithmetic on a stored play count
//! goes through [`parse_play_count`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Unit suffix meaning "× 10 000".
pub const TEN_THOUSAND_UNIT: char = '万';

/// Parses a raw play-count field into an integer.
///
/// Never fails: empty, malformed or out-of-range input yields `0`.
/// Unit-suffixed values are truncated toward zero after scaling.
#[must_use]
pub fn parse_play_count(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    if raw.contains(TEN_THOUSAND_UNIT) {
        let digits: String = raw.chars().filter(|c| *c != TEN_THOUSAND_UNIT).collect();
        return Decimal::from_str(digits.trim())
            .ok()
            .and_then(|value| value.checked_mul(Decimal::from(10_000)))
            .and_then(|scaled| scaled.trunc().to_i64())
            .unwrap_or(0);
    }

    raw.parse::<i64>().unwrap_or(0)
}
