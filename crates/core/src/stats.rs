//! Roll-up caps and numeric presentation rules for catalog statistics.
//!
//! Aggregates are computed at full precision by the store; everything here
//! runs at the response boundary only.

use serde::Deserialize;

/// Upper bound for any caller-supplied aggregation cap.
pub const MAX_STATS_LIMIT: i64 = 100;

/// Decimal places kept for per-group averages and per-genre percentages.
pub const AVERAGE_DECIMALS: u32 = 2;

/// Milliseconds per minute.
const MS_PER_MINUTE: f64 = 60_000.0;

/// Result-size caps for each roll-up, per consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    /// Genre stats inside the dashboard snapshot.
    pub dashboard_genres: i64,
    /// Artist stats inside the dashboard snapshot.
    pub dashboard_artists: i64,
    /// Top tracks inside the dashboard snapshot.
    pub dashboard_top_tracks: i64,
    /// Explicit-by-genre rows, both endpoint and snapshot.
    pub explicit_by_genre: i64,
    /// `GET /dashboard/artist-stats` default.
    pub artist_stats: i64,
    /// `GET /dashboard/top-popular` default.
    pub top_popular: i64,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            dashboard_genres: 10,
            dashboard_artists: 10,
            dashboard_top_tracks: 10,
            explicit_by_genre: 5,
            artist_stats: 7,
            top_popular: 5,
        }
    }
}

/// Ordering for the artist roll-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistOrder {
    /// Most tracks first.
    #[default]
    TrackCount,
    /// Highest average popularity first.
    AvgPopularity,
}

/// Resolve an optional caller cap against a default, bounded to
/// `1..=MAX_STATS_LIMIT`.
pub fn clamp_cap(requested: Option<i64>, default: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, MAX_STATS_LIMIT)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Integer percentage `round(100 * part / whole)`; zero when `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as i64
}

/// Percentage rounded to [`AVERAGE_DECIMALS`] places; zero when `whole` is zero.
pub fn percentage_2dp(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_to(100.0 * part as f64 / whole as f64, AVERAGE_DECIMALS)
}

/// Milliseconds to minutes with one decimal place.
pub fn ms_to_minutes(ms: f64) -> f64 {
    round_to(ms / MS_PER_MINUTE, 1)
}

/// A unit-interval average expressed as a rounded whole percentage.
pub fn unit_to_percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}
