#![allow(dead_code)]

use catalog_core::filters::{NormalizedTrackQuery, TrackListParams, BULK_LISTING_CAP};
use catalog_core::retrieval::RetrievalPlan;
use catalog_core::track::ArtistName;
use catalog_db::models::track::{CreateTrack, Track};
use catalog_db::repositories::TrackRepo;
use sqlx::PgPool;

/// A valid create payload with neutral feature values.
pub fn new_track(name: &str, artist: &str, genre: &str) -> CreateTrack {
    CreateTrack {
        name: name.to_string(),
        artist_name: ArtistName::Single(artist.to_string()),
        genre: genre.to_string(),
        explicit: false,
        duration_ms: 200_000,
        popularity: 50,
        danceability: 0.5,
        energy: 0.5,
        valence: 0.5,
        tempo: 120.0,
        num_artists: 1,
    }
}

pub async fn insert(pool: &PgPool, input: CreateTrack) -> Track {
    TrackRepo::create(pool, &input)
        .await
        .expect("track insert should succeed")
}

pub fn plan(params: TrackListParams) -> RetrievalPlan {
    RetrievalPlan::from_query(&NormalizedTrackQuery::from_params(&params, BULK_LISTING_CAP))
}
