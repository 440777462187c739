//! Track entity model, listing projections, and write DTOs.

use catalog_core::track::{validate_artist_name, validate_not_blank, ArtistName};
use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tracks` table (public columns only).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub name: String,
    #[sqlx(json)]
    pub artist_name: ArtistName,
    pub genre: String,
    pub explicit: bool,
    pub duration_ms: i64,
    pub popularity: i32,
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub num_artists: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing projection: the fields list and bulk views render.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TrackSummary {
    pub id: DbId,
    pub name: String,
    #[sqlx(json)]
    pub artist_name: ArtistName,
    pub genre: String,
    pub explicit: bool,
    pub popularity: i32,
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
    pub duration_ms: i64,
}

/// Which column set a listing query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Full,
    Summary,
}

impl Projection {
    pub fn columns(self) -> &'static str {
        match self {
            Projection::Full => FULL_COLUMNS,
            Projection::Summary => SUMMARY_COLUMNS,
        }
    }
}

/// Column list for [`Track`].
pub const FULL_COLUMNS: &str = "id, name, artist_name, genre, explicit, duration_ms, popularity, \
     danceability, energy, valence, tempo, num_artists, created_at, updated_at";

/// Column list for [`TrackSummary`].
pub const SUMMARY_COLUMNS: &str =
    "id, name, artist_name, genre, explicit, popularity, energy, danceability, valence, duration_ms";

/// DTO for creating a new track. Validated before it reaches the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrack {
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = "validate_not_blank", message = "name must not be blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_artist_name"))]
    pub artist_name: ArtistName,
    #[validate(
        length(min = 1, max = 100, message = "genre must be 1-100 characters"),
        custom(function = "validate_not_blank", message = "genre must not be blank")
    )]
    pub genre: String,
    #[serde(default)]
    pub explicit: bool,
    #[validate(range(min = 0, message = "duration_ms must be >= 0"))]
    pub duration_ms: i64,
    #[validate(range(min = 0, max = 100, message = "popularity must be between 0 and 100"))]
    pub popularity: i32,
    #[validate(range(min = 0.0, max = 1.0, message = "danceability must be between 0 and 1"))]
    pub danceability: f64,
    #[validate(range(min = 0.0, max = 1.0, message = "energy must be between 0 and 1"))]
    pub energy: f64,
    #[validate(range(min = 0.0, max = 1.0, message = "valence must be between 0 and 1"))]
    pub valence: f64,
    #[validate(range(min = 0.0, message = "tempo must be >= 0"))]
    pub tempo: f64,
    #[validate(range(min = 1, message = "num_artists must be >= 1"))]
    pub num_artists: i32,
}

/// DTO for a partial update. Only present fields are validated and applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrack {
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = "validate_not_blank", message = "name must not be blank")
    )]
    pub name: Option<String>,
    #[validate(custom(function = "validate_artist_name"))]
    pub artist_name: Option<ArtistName>,
    #[validate(
        length(min = 1, max = 100, message = "genre must be 1-100 characters"),
        custom(function = "validate_not_blank", message = "genre must not be blank")
    )]
    pub genre: Option<String>,
    pub explicit: Option<bool>,
    #[validate(range(min = 0, message = "duration_ms must be >= 0"))]
    pub duration_ms: Option<i64>,
    #[validate(range(min = 0, max = 100, message = "popularity must be between 0 and 100"))]
    pub popularity: Option<i32>,
    #[validate(range(min = 0.0, max = 1.0, message = "danceability must be between 0 and 1"))]
    pub danceability: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0, message = "energy must be between 0 and 1"))]
    pub energy: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0, message = "valence must be between 0 and 1"))]
    pub valence: Option<f64>,
    #[validate(range(min = 0.0, message = "tempo must be >= 0"))]
    pub tempo: Option<f64>,
    #[validate(range(min = 1, message = "num_artists must be >= 1"))]
    pub num_artists: Option<i32>,
}
