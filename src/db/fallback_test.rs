//! Tests for backend selection and fallback.

use serde_json::json;

use crate::db::document::Filter;
use crate::db::{Collection, DocumentStore, FallbackStore, SqliteStore};

fn doc(id: &str) -> crate::db::Document {
    json!({"_id": id, "text": "x"}).as_object().cloned().unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn no_url_uses_memory() {
    let store = FallbackStore::connect(None).await;
    assert_eq!(store.backend(), "memory");

    store.collection("things").insert_one(doc("a")).await.unwrap();
    assert_eq!(store.collection("things").count(&Filter::new()).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_url_uses_memory() {
    let store = FallbackStore::connect(Some("  ")).await;
    assert_eq!(store.backend(), "memory");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_connect_persists_memory_across_calls() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}",
        dir.path().join("missing").join("todos.db").display()
    );

    let store = FallbackStore::connect(Some(&url)).await;
    assert_eq!(store.backend(), "memory");

    store.collection("things").insert_one(doc("a")).await.unwrap();
    let found = store
        .collection("things")
        .find_one(&Filter::by_id("a"))
        .await
        .unwrap();
    assert!(found.is_some());

    // Clones share the same in-memory store.
    let clone = store.clone();
    assert_eq!(clone.collection("things").count(&Filter::new()).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn reachable_database_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("todos.db").display());

    let store = FallbackStore::connect(Some(&url)).await;
    assert_eq!(store.backend(), "sqlite");

    store.collection("things").insert_one(doc("a")).await.unwrap();

    let direct = SqliteStore::connect(&url).await.unwrap();
    assert!(
        direct
            .collection("things")
            .find_one(&Filter::by_id("a"))
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_errors_retry_on_memory() {
    let sqlite = SqliteStore::in_memory().await.unwrap();
    let store = FallbackStore::with_primary(sqlite.clone());

    sqlite.pool().close().await;

    store.collection("things").insert_one(doc("a")).await.unwrap();
    let found = store
        .collection("things")
        .find_one(&Filter::by_id("a"))
        .await
        .unwrap();
    assert!(found.is_some());
}
