//! Raw roll-up rows returned by [`StatsRepo`](crate::repositories::StatsRepo).
//!
//! Values are full precision; rounding happens in the API layer.

use catalog_core::track::ArtistName;
use catalog_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// One genre group.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GenreStatsRow {
    pub genre: String,
    pub count: i64,
    pub avg_tempo: f64,
    pub avg_energy: f64,
    pub avg_popularity: f64,
    pub avg_danceability: f64,
}

/// One artist-credit group. List-valued and scalar credits group separately.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ArtistStatsRow {
    #[sqlx(json)]
    pub artist_name: ArtistName,
    pub track_count: i64,
    pub avg_popularity: f64,
}

/// Display fields for top-N listings.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TrackHighlight {
    pub id: DbId,
    pub name: String,
    #[sqlx(json)]
    pub artist_name: ArtistName,
    pub popularity: i32,
    pub genre: String,
}

/// Global explicit-content counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ExplicitCounts {
    pub total_tracks: i64,
    pub explicit_count: i64,
}

/// Explicit-content counts for one genre.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExplicitGenreRow {
    pub genre: String,
    pub total_count: i64,
    pub explicit_count: i64,
}

/// One bucket of the popularity histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct PopularityBucket {
    pub popularity: i32,
    pub count: i64,
}

/// Collection-wide averages. Averages are zero on an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct AverageMetrics {
    pub total_tracks: i64,
    pub total_genres: i64,
    pub avg_popularity: f64,
    pub avg_duration_ms: f64,
    pub avg_energy: f64,
    pub avg_danceability: f64,
    pub avg_tempo: f64,
}

/// Per-track audio metrics for chart scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct TrackMetricPoint {
    pub id: DbId,
    pub popularity: i32,
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
    pub duration_ms: i64,
}
