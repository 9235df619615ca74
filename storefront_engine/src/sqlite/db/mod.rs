//! # SQLite database methods
//!
//! "Low-level" SQLite interactions, kept as simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection`. Callers obtain a connection from the pool, or open a transaction and pass
//! `&mut tx` through unchanged — that is how [`super::SqliteDatabase`] composes several of these calls
//! into one atomic unit.

use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod orders;
pub mod payments;
pub mod products;

const SQLITE_DB_URL: &str = "sqlite://data/storefront.db";

pub fn db_url() -> String {
    let result = env::var("SFE_DATABASE_URL").unwrap_or_else(|_| {
        info!("SFE_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// WAL keeps readers off the writer's lock; the busy timeout bounds how long a transaction waits for a
/// competing writer before the wait surfaces as a retryable conflict.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
