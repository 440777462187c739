#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use catalog_api::auth::jwt::{generate_access_token, JwtConfig};
use catalog_api::config::ServerConfig;
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_core::roles::{ROLE_ADMIN, ROLE_USER};
use catalog_core::stats::AggregationLimits;
use catalog_core::track::ArtistName;
use catalog_db::models::track::{CreateTrack, Track};
use catalog_db::repositories::TrackRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        bulk_listing_cap: 2000,
        limits: AggregationLimits::default(),
    }
}

/// Build the full application router (production middleware stack) over
/// the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(config),
    })
}

pub fn admin_token() -> String {
    generate_access_token(1, ROLE_ADMIN, &test_config().jwt).unwrap()
}

pub fn user_token() -> String {
    generate_access_token(2, ROLE_USER, &test_config().jwt).unwrap()
}

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

/// Insert directly through the repository, bypassing HTTP.
pub async fn seed(pool: &PgPool, input: CreateTrack) -> Track {
    TrackRepo::create(pool, &input).await.unwrap()
}

/// A JSON create body matching [`new_track`].
pub fn track_json(name: &str, artist: serde_json::Value, popularity: i64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "artist_name": artist,
        "genre": "pop",
        "explicit": false,
        "duration_ms": 200000,
        "popularity": popularity,
        "danceability": 0.5,
        "energy": 0.5,
        "valence": 0.5,
        "tempo": 120.0,
        "num_artists": 1
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send_json(app, Method::POST, uri, body, token).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, body, token).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
