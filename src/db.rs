//!
//! # Storage setup
//!
//! Pool construction and schema application for the SQLite store. The
//! connection is retried with a fixed delay instead of failing the process,
//! so a slow-starting storage dependency only delays startup.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Connects to the database, retrying indefinitely on failure.
///
/// A malformed `database_url` is not retryable and is reported immediately.
pub async fn connect_with_retry(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    loop {
        match SqlitePoolOptions::new()
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                log::warn!(
                    "Database connection failed: {}. Retrying in {:?}...",
                    e,
                    CONNECT_RETRY_DELAY
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }
    }
}

/// Applies the schema. Idempotent, run at every startup.
///
/// Email uniqueness is case-insensitive (`COLLATE NOCASE`); handlers also
/// lowercase emails at the boundary so lookups and storage agree.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL COLLATE NOCASE UNIQUE,
            password_hash TEXT NOT NULL,
            avatar TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id BLOB PRIMARY KEY,
            user_id BLOB NOT NULL REFERENCES users(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            priority TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
