//! Handlers for the `/dashboard` statistics endpoints.
//!
//! Roll-ups arrive from [`StatsRepo`] at full precision and are rounded
//! here, at the response boundary, and nowhere else.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::stats::{
    clamp_cap, ms_to_minutes, percentage, percentage_2dp, round_to, unit_to_percent,
    ArtistOrder, AVERAGE_DECIMALS, MAX_STATS_LIMIT,
};
use catalog_core::track::ArtistName;
use catalog_db::models::stats::{
    ArtistStatsRow, AverageMetrics, ExplicitCounts, ExplicitGenreRow, GenreStatsRow,
    TrackHighlight,
};
use catalog_db::repositories::StatsRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::StatsParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Placeholder for `top_genre` on an empty collection.
const NO_GENRE: &str = "N/A";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStat {
    pub genre: String,
    pub count: i64,
    pub avg_tempo: f64,
    pub avg_energy: f64,
    pub avg_popularity: f64,
    pub avg_danceability: f64,
}

impl From<GenreStatsRow> for GenreStat {
    fn from(row: GenreStatsRow) -> Self {
        Self {
            genre: row.genre,
            count: row.count,
            avg_tempo: round_to(row.avg_tempo, AVERAGE_DECIMALS),
            avg_energy: round_to(row.avg_energy, AVERAGE_DECIMALS),
            avg_popularity: round_to(row.avg_popularity, AVERAGE_DECIMALS),
            avg_danceability: round_to(row.avg_danceability, AVERAGE_DECIMALS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistStat {
    pub artist_name: ArtistName,
    pub track_count: i64,
    pub avg_popularity: f64,
}

impl From<ArtistStatsRow> for ArtistStat {
    fn from(row: ArtistStatsRow) -> Self {
        Self {
            artist_name: row.artist_name,
            track_count: row.track_count,
            avg_popularity: round_to(row.avg_popularity, AVERAGE_DECIMALS),
        }
    }
}

/// Global explicit-content ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplicitStats {
    pub total_tracks: i64,
    pub explicit_count: i64,
    pub explicit_percentage: i64,
}

impl From<ExplicitCounts> for ExplicitStats {
    fn from(counts: ExplicitCounts) -> Self {
        Self {
            total_tracks: counts.total_tracks,
            explicit_count: counts.explicit_count,
            explicit_percentage: percentage(counts.explicit_count, counts.total_tracks),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplicitGenreStat {
    pub genre: String,
    pub total_count: i64,
    pub explicit_count: i64,
    pub explicit_percentage: f64,
}

impl From<ExplicitGenreRow> for ExplicitGenreStat {
    fn from(row: ExplicitGenreRow) -> Self {
        Self {
            explicit_percentage: percentage_2dp(row.explicit_count, row.total_count),
            genre: row.genre,
            total_count: row.total_count,
            explicit_count: row.explicit_count,
        }
    }
}

/// The composite dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_tracks: i64,
    pub total_genres: i64,
    pub avg_popularity: i64,
    pub avg_duration_minutes: f64,
    /// Average energy as a whole percentage.
    pub avg_energy: i64,
    /// Average danceability as a whole percentage.
    pub avg_danceability: i64,
    pub avg_tempo: i64,
    pub explicit_count: i64,
    pub explicit_percentage: i64,
    pub top_genre: String,
    pub genre_stats: Vec<GenreStat>,
    pub artist_stats: Vec<ArtistStat>,
    pub top_tracks: Vec<TrackHighlight>,
    pub explicit_by_genre: Vec<ExplicitGenreStat>,
}

impl DashboardSnapshot {
    /// Reshape the independent roll-ups into one response.
    pub fn assemble(
        metrics: AverageMetrics,
        genres: Vec<GenreStatsRow>,
        artists: Vec<ArtistStatsRow>,
        top_tracks: Vec<TrackHighlight>,
        explicit: ExplicitCounts,
        explicit_by_genre: Vec<ExplicitGenreRow>,
    ) -> Self {
        let genre_stats: Vec<GenreStat> = genres.into_iter().map(GenreStat::from).collect();
        let top_genre = genre_stats
            .first()
            .map(|g| g.genre.clone())
            .unwrap_or_else(|| NO_GENRE.to_string());

        Self {
            total_tracks: metrics.total_tracks,
            total_genres: metrics.total_genres,
            avg_popularity: metrics.avg_popularity.round() as i64,
            avg_duration_minutes: ms_to_minutes(metrics.avg_duration_ms),
            avg_energy: unit_to_percent(metrics.avg_energy),
            avg_danceability: unit_to_percent(metrics.avg_danceability),
            avg_tempo: metrics.avg_tempo.round() as i64,
            explicit_count: explicit.explicit_count,
            explicit_percentage: percentage(explicit.explicit_count, explicit.total_tracks),
            top_genre,
            genre_stats,
            artist_stats: artists.into_iter().map(ArtistStat::from).collect(),
            top_tracks,
            explicit_by_genre: explicit_by_genre
                .into_iter()
                .map(ExplicitGenreStat::from)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/stats
///
/// Runs every roll-up concurrently. Any failing branch fails the whole
/// snapshot; a partial snapshot is never returned.
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let limits = state.config.limits;

    let (metrics, genres, artists, top_tracks, explicit, explicit_by_genre) = tokio::try_join!(
        StatsRepo::average_metrics(pool),
        StatsRepo::genre_stats(pool, Some(limits.dashboard_genres)),
        StatsRepo::artist_stats(pool, ArtistOrder::AvgPopularity, limits.dashboard_artists),
        StatsRepo::top_popular(pool, limits.dashboard_top_tracks),
        StatsRepo::explicit_counts(pool),
        StatsRepo::explicit_by_genre(pool, limits.explicit_by_genre),
    )?;

    tracing::debug!(
        total_tracks = metrics.total_tracks,
        genres = genres.len(),
        artists = artists.len(),
        "Dashboard snapshot assembled"
    );

    let snapshot = DashboardSnapshot::assemble(
        metrics,
        genres,
        artists,
        top_tracks,
        explicit,
        explicit_by_genre,
    );
    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/dashboard/genre-stats?limit=
///
/// Every genre unless `limit` is given.
pub async fn genre_stats(
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let limit = params.limit.map(|l| l.clamp(1, MAX_STATS_LIMIT));

    let rows = StatsRepo::genre_stats(&state.pool, limit).await?;
    let data: Vec<GenreStat> = rows.into_iter().map(GenreStat::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/artist-stats?limit=&sort=track_count|avg_popularity
pub async fn artist_stats(
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let limit = clamp_cap(params.limit, state.config.limits.artist_stats);
    let order = params.sort.unwrap_or_default();

    let rows = StatsRepo::artist_stats(&state.pool, order, limit).await?;
    let data: Vec<ArtistStat> = rows.into_iter().map(ArtistStat::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/top-popular?limit=
pub async fn top_popular(
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let limit = clamp_cap(params.limit, state.config.limits.top_popular);

    let data = StatsRepo::top_popular(&state.pool, limit).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/explicit-stats
pub async fn explicit_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = StatsRepo::explicit_counts(&state.pool).await?;
    Ok(Json(DataResponse {
        data: ExplicitStats::from(counts),
    }))
}

/// GET /api/v1/dashboard/explicit-by-genre?limit=
pub async fn explicit_by_genre(
    State(state): State<AppState>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let limit = clamp_cap(params.limit, state.config.limits.explicit_by_genre);

    let rows = StatsRepo::explicit_by_genre(&state.pool, limit).await?;
    let data: Vec<ExplicitGenreStat> = rows.into_iter().map(ExplicitGenreStat::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/popularity-distribution
pub async fn popularity_distribution(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let data = StatsRepo::popularity_distribution(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/all-tracks
///
/// Per-track audio metrics for charting, capped at the bulk ceiling.
pub async fn all_tracks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = StatsRepo::metric_points(&state.pool, state.config.bulk_listing_cap).await?;
    Ok(Json(DataResponse { data }))
}
