//! Tests for SQLite connection and migrations.

use crate::db::{DbError, DocumentStore, SqliteStore};

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_documents_table() {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to create in-memory database");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(store.pool())
            .await
            .expect("Query should succeed");

    assert!(tables.contains(&"documents".to_string()));
    assert!(tables.contains(&"_sqlx_migrations".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.expect("second migration run");
    store.migrate().await.expect("third migration run");
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");
    let url = format!("sqlite://{}", path.display());

    let store = SqliteStore::connect(&url).await.expect("connect");
    assert_eq!(store.backend(), "sqlite");
    assert!(path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}",
        dir.path().join("missing").join("todos.db").display()
    );
    let result = SqliteStore::connect(&url).await;
    assert!(matches!(result, Err(DbError::Connection { .. })));
}
