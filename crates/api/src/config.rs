use std::str::FromStr;

use catalog_core::filters::BULK_LISTING_CAP;
use catalog_core::stats::AggregationLimits;

use crate::auth::jwt::JwtConfig;

/// Default pool size when `DB_MAX_CONNECTIONS` is unset.
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// Hard ceiling on rows returned by any listing (default: `2000`).
    pub bulk_listing_cap: i64,
    /// Result-size caps for the dashboard roll-ups.
    pub limits: AggregationLimits,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `DB_MAX_CONNECTIONS`         | `20`                    |
    /// | `BULK_LISTING_CAP`           | `2000`                  |
    /// | `DASHBOARD_GENRE_LIMIT`      | `10`                    |
    /// | `DASHBOARD_ARTIST_LIMIT`     | `10`                    |
    /// | `DASHBOARD_TOP_TRACKS_LIMIT` | `10`                    |
    /// | `EXPLICIT_BY_GENRE_LIMIT`    | `5`                     |
    /// | `ARTIST_STATS_LIMIT`         | `7`                     |
    /// | `TOP_POPULAR_LIMIT`          | `5`                     |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values or a missing `JWT_SECRET`; misconfiguration
    /// fails fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = AggregationLimits::default();
        let limits = AggregationLimits {
            dashboard_genres: env_or("DASHBOARD_GENRE_LIMIT", defaults.dashboard_genres),
            dashboard_artists: env_or("DASHBOARD_ARTIST_LIMIT", defaults.dashboard_artists),
            dashboard_top_tracks: env_or(
                "DASHBOARD_TOP_TRACKS_LIMIT",
                defaults.dashboard_top_tracks,
            ),
            explicit_by_genre: env_or("EXPLICIT_BY_GENRE_LIMIT", defaults.explicit_by_genre),
            artist_stats: env_or("ARTIST_STATS_LIMIT", defaults.artist_stats),
            top_popular: env_or("TOP_POPULAR_LIMIT", defaults.top_popular),
        };

        let bulk_listing_cap: i64 = env_or("BULK_LISTING_CAP", BULK_LISTING_CAP);
        assert!(bulk_listing_cap > 0, "BULK_LISTING_CAP must be positive");

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            jwt: JwtConfig::from_env(),
            bulk_listing_cap,
            limits,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}
