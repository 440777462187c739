//! PostgreSQL access for the track catalog.
//!
//! The pool is the only store handle. It is opened once at startup with
//! [`create_pool`], shared by reference through application state, and
//! released with [`close_pool`] after the server stops accepting requests.
//! Repositories never hold their own connections.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Close every pooled connection, waiting for checked-out ones to return.
pub async fn close_pool(pool: &DbPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}
