//! Shared query parameter types for API handlers.

use catalog_core::stats::ArtistOrder;
use serde::Deserialize;

/// Query parameters accepted by the dashboard roll-up endpoints
/// (`?limit=&sort=`).
///
/// `limit` is clamped by the handler; `sort` is only read by the artist
/// roll-up.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub limit: Option<i64>,
    pub sort: Option<ArtistOrder>,
}
