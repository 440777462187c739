use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. The only store handle in the process.
    pub pool: catalog_db::DbPool,
    /// Immutable server configuration.
    pub config: Arc<ServerConfig>,
}
