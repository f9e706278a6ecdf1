//! SQLite database connection and migration management.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::collection::SqliteCollection;
use super::helpers::map_sqlx_error;
use crate::db::{DbError, DbResult, DocumentStore};

/// SQLite-backed document store.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `url` (e.g. `sqlite://todos.db`), creating the
    /// file when missing, and run migrations.
    pub async fn connect(url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbError::Connection {
                message: format!("Invalid database URL '{}': {}", url, e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// A single connection that never expires, otherwise every new pooled
    /// connection would see a fresh empty database.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            DbError::Connection {
                message: e.to_string(),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply embedded migrations. Safe to run repeatedly.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./data/sql/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    /// Direct pool access for tests and diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl DocumentStore for SqliteStore {
    type Collection = SqliteCollection;

    fn collection(&self, name: &str) -> SqliteCollection {
        SqliteCollection::new(self.pool.clone(), name)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
