use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`. All public, all read-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/genre-stats", get(dashboard::genre_stats))
        .route("/artist-stats", get(dashboard::artist_stats))
        .route("/top-popular", get(dashboard::top_popular))
        .route("/explicit-stats", get(dashboard::explicit_stats))
        .route("/explicit-by-genre", get(dashboard::explicit_by_genre))
        .route(
            "/popularity-distribution",
            get(dashboard::popularity_distribution),
        )
        .route("/all-tracks", get(dashboard::all_tracks))
}
