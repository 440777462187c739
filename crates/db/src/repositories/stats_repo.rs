//! Read-only roll-ups over the `tracks` table.
//!
//! Every method is a single SQL round-trip returning full-precision values.

use catalog_core::stats::ArtistOrder;
use sqlx::PgPool;

use crate::models::stats::{
    ArtistStatsRow, AverageMetrics, ExplicitCounts, ExplicitGenreRow, GenreStatsRow,
    PopularityBucket, TrackHighlight, TrackMetricPoint,
};

/// Column list for [`TrackHighlight`].
const HIGHLIGHT_COLUMNS: &str = "id, name, artist_name, popularity, genre";

/// Column list for [`TrackMetricPoint`].
const METRIC_POINT_COLUMNS: &str = "id, popularity, energy, danceability, valence, duration_ms";

/// Provides the fixed set of catalog aggregations.
pub struct StatsRepo;

impl StatsRepo {
    /// Per-genre count and feature averages, largest genre first.
    ///
    /// `None` returns every genre.
    pub async fn genre_stats(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<GenreStatsRow>, sqlx::Error> {
        sqlx::query_as::<_, GenreStatsRow>(
            "SELECT genre, \
                    COUNT(*) AS count, \
                    AVG(tempo)::float8 AS avg_tempo, \
                    AVG(energy)::float8 AS avg_energy, \
                    AVG(popularity)::float8 AS avg_popularity, \
                    AVG(danceability)::float8 AS avg_danceability \
             FROM tracks \
             GROUP BY genre \
             ORDER BY count DESC, genre \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Per-artist-credit track count and average popularity.
    ///
    /// Credits group by exact stored value, so a list credit and a single
    /// name never merge.
    pub async fn artist_stats(
        pool: &PgPool,
        order: ArtistOrder,
        limit: i64,
    ) -> Result<Vec<ArtistStatsRow>, sqlx::Error> {
        let order_by = match order {
            ArtistOrder::TrackCount => "track_count DESC, avg_popularity DESC",
            ArtistOrder::AvgPopularity => "avg_popularity DESC, track_count DESC",
        };
        let query = format!(
            "SELECT artist_name, \
                    COUNT(*) AS track_count, \
                    AVG(popularity)::float8 AS avg_popularity \
             FROM tracks \
             GROUP BY artist_name \
             ORDER BY {order_by}, MIN(artist_search) \
             LIMIT $1"
        );
        sqlx::query_as::<_, ArtistStatsRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most popular tracks.
    pub async fn top_popular(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<TrackHighlight>, sqlx::Error> {
        let query = format!(
            "SELECT {HIGHLIGHT_COLUMNS} FROM tracks ORDER BY popularity DESC, id LIMIT $1"
        );
        sqlx::query_as::<_, TrackHighlight>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total and explicit track counts. Both are zero on an empty table.
    pub async fn explicit_counts(pool: &PgPool) -> Result<ExplicitCounts, sqlx::Error> {
        sqlx::query_as::<_, ExplicitCounts>(
            "SELECT COUNT(*) AS total_tracks, \
                    COUNT(*) FILTER (WHERE explicit) AS explicit_count \
             FROM tracks",
        )
        .fetch_one(pool)
        .await
    }

    /// Per-genre explicit counts, highest explicit ratio first.
    pub async fn explicit_by_genre(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ExplicitGenreRow>, sqlx::Error> {
        sqlx::query_as::<_, ExplicitGenreRow>(
            "SELECT genre, \
                    COUNT(*) AS total_count, \
                    COUNT(*) FILTER (WHERE explicit) AS explicit_count \
             FROM tracks \
             GROUP BY genre \
             ORDER BY (COUNT(*) FILTER (WHERE explicit))::float8 / COUNT(*) DESC, \
                      total_count DESC, genre \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Track count per popularity value, ascending by popularity.
    pub async fn popularity_distribution(
        pool: &PgPool,
    ) -> Result<Vec<PopularityBucket>, sqlx::Error> {
        sqlx::query_as::<_, PopularityBucket>(
            "SELECT popularity, COUNT(*) AS count \
             FROM tracks \
             GROUP BY popularity \
             ORDER BY popularity ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Collection-wide totals and averages in one row.
    pub async fn average_metrics(pool: &PgPool) -> Result<AverageMetrics, sqlx::Error> {
        sqlx::query_as::<_, AverageMetrics>(
            "SELECT COUNT(*) AS total_tracks, \
                    COUNT(DISTINCT genre) AS total_genres, \
                    COALESCE(AVG(popularity), 0)::float8 AS avg_popularity, \
                    COALESCE(AVG(duration_ms), 0)::float8 AS avg_duration_ms, \
                    COALESCE(AVG(energy), 0)::float8 AS avg_energy, \
                    COALESCE(AVG(danceability), 0)::float8 AS avg_danceability, \
                    COALESCE(AVG(tempo), 0)::float8 AS avg_tempo \
             FROM tracks",
        )
        .fetch_one(pool)
        .await
    }

    /// Audio metrics for up to `limit` tracks, most popular first.
    pub async fn metric_points(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<TrackMetricPoint>, sqlx::Error> {
        let query = format!(
            "SELECT {METRIC_POINT_COLUMNS} FROM tracks ORDER BY popularity DESC, id LIMIT $1"
        );
        sqlx::query_as::<_, TrackMetricPoint>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
