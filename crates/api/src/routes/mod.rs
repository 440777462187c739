pub mod dashboard;
pub mod health;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tracks                                  list (public), create (admin)
/// /tracks/all                              bulk listing (public)
/// /tracks/{id}                             get (public), update, delete (admin)
///
/// /dashboard/stats                         composite snapshot
/// /dashboard/genre-stats                   genre roll-up
/// /dashboard/artist-stats                  artist roll-up
/// /dashboard/top-popular                   most popular tracks
/// /dashboard/explicit-stats                global explicit ratio
/// /dashboard/explicit-by-genre             per-genre explicit ratio
/// /dashboard/popularity-distribution       popularity histogram
/// /dashboard/all-tracks                    per-track metrics for charts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tracks", track::router())
        .nest("/dashboard", dashboard::router())
}
