//! Tests for the todo repository.

use crate::db::{DbError, DocumentStore, ItemUpsert, MemoryStore, SqliteStore};

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_list() {
    let store = MemoryStore::new();
    let todos = store.todos();

    let list = todos.create_list("Groceries").await.unwrap();
    assert_eq!(list.title, "Groceries");
    assert!(!list.share_token.is_empty());

    let fetched = todos.get_list(&list.id).await.unwrap().unwrap();
    assert_eq!(fetched, list);
    assert!(todos.get_list("missing").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn add_assigns_order_from_item_count() {
    let store = MemoryStore::new();
    let todos = store.todos();
    let list = todos.create_list("Chores").await.unwrap();

    for text in ["a", "b", "c"] {
        todos.add_item(&list.id, text).await.unwrap();
    }

    let items = todos.items_by_order(&list.id).await.unwrap();
    let orders: Vec<_> = items.iter().map(|item| item.order).collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
    assert!(items.iter().all(|item| !item.completed));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_to_missing_list_is_not_found() {
    let store = MemoryStore::new();
    let err = store.todos().add_item("missing", "x").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_leaves_other_orders_and_allows_duplicates() {
    let store = MemoryStore::new();
    let todos = store.todos();
    let list = todos.create_list("Chores").await.unwrap();

    let first = todos.add_item(&list.id, "a").await.unwrap();
    todos.add_item(&list.id, "b").await.unwrap();
    todos.add_item(&list.id, "c").await.unwrap();

    assert!(todos.delete_item(&list.id, &first.id).await.unwrap());
    assert!(!todos.delete_item(&list.id, &first.id).await.unwrap());

    let orders: Vec<_> = todos
        .items_by_order(&list.id)
        .await
        .unwrap()
        .iter()
        .map(|item| item.order)
        .collect();
    assert_eq!(orders, vec![Some(1), Some(2)]);

    // Count is now 2, so the next add repeats order 2.
    let next = todos.add_item(&list.id, "d").await.unwrap();
    assert_eq!(next.order, Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn set_completed_is_scoped_to_the_list() {
    let store = MemoryStore::new();
    let todos = store.todos();
    let list = todos.create_list("A").await.unwrap();
    let other = todos.create_list("B").await.unwrap();
    let item = todos.add_item(&list.id, "x").await.unwrap();

    assert!(!todos.set_completed(&other.id, &item.id, true).await.unwrap());
    assert!(todos.set_completed(&list.id, &item.id, true).await.unwrap());
    assert!(todos.set_completed(&list.id, &item.id, true).await.unwrap());

    let items = todos.items_by_creation(&list.id).await.unwrap();
    assert!(items[0].completed);
    assert!(items[0].updated_at.is_some());

    assert!(!todos.delete_item(&other.id, &item.id).await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_with_same_id_updates_instead_of_duplicating() {
    let store = MemoryStore::new();
    let todos = store.todos();
    let list = todos.create_list("Trip").await.unwrap();

    let first = [ItemUpsert {
        id: Some("item-1".to_string()),
        text: "pack".to_string(),
        completed: false,
    }];
    let (_, result) = todos.upsert_items(&list.id, &first).await.unwrap();
    assert_eq!(result.upserted_count, 1);

    let second = [ItemUpsert {
        id: Some("item-1".to_string()),
        text: "pack bags".to_string(),
        completed: true,
    }];
    let (returned, result) = todos.upsert_items(&list.id, &second).await.unwrap();
    assert_eq!(returned.title, "Trip");
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.upserted_count, 0);

    let items = todos.items_by_creation(&list.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "pack bags");
    assert!(items[0].completed);
    assert_eq!(items[0].order, Some(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_without_id_always_creates() {
    let store = MemoryStore::new();
    let todos = store.todos();
    let list = todos.create_list("Trip").await.unwrap();
    let fresh = [ItemUpsert {
        id: None,
        text: "tickets".to_string(),
        completed: false,
    }];

    todos.upsert_items(&list.id, &fresh).await.unwrap();
    todos.upsert_items(&list.id, &fresh).await.unwrap();

    let items = todos.items_by_creation(&list.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_ne!(items[0].id, items[1].id);
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_into_missing_list_is_not_found() {
    let store = MemoryStore::new();
    let items = [ItemUpsert {
        id: None,
        text: "x".to_string(),
        completed: false,
    }];
    let err = store.todos().upsert_items("missing", &items).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_with_items_newest_first_and_scoped() {
    let store = MemoryStore::new();
    let todos = store.todos();

    let older = todos.create_list("older").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = todos.create_list("newer").await.unwrap();

    todos.add_item(&older.id, "old item").await.unwrap();
    todos.add_item(&newer.id, "new item").await.unwrap();

    let lists = todos.lists_with_items().await.unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].list.id, newer.id);
    assert_eq!(lists[0].items.len(), 1);
    assert_eq!(lists[0].items[0].text, "new item");
    assert_eq!(lists[1].list.id, older.id);
    assert_eq!(lists[1].items[0].text, "old item");
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_works_on_sqlite() {
    let store = SqliteStore::in_memory().await.unwrap();
    let todos = store.todos();
    let list = todos.create_list("Persistent").await.unwrap();

    let item = todos.add_item(&list.id, "write to disk").await.unwrap();
    assert!(todos.set_completed(&list.id, &item.id, true).await.unwrap());

    let items = todos.items_by_order(&list.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].completed);

    let grouped = todos.items_grouped_by_list().await.unwrap();
    assert_eq!(grouped[&list.id][0].id, item.id);
}

async fn upsert_cannot_take_item_from_another_list<S: DocumentStore>(store: &S) {
    let todos = store.todos();
    let first = todos.create_list("First").await.unwrap();
    let second = todos.create_list("Second").await.unwrap();
    let item = todos.add_item(&first.id, "stay here").await.unwrap();

    let err = todos
        .upsert_items(
            &second.id,
            &[
                ItemUpsert {
                    id: None,
                    text: "fresh".to_string(),
                    completed: false,
                },
                ItemUpsert {
                    id: Some(item.id.clone()),
                    text: "moved".to_string(),
                    completed: true,
                },
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidData { .. }));

    let kept = todos.items_by_creation(&first.id).await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, item.id);
    assert_eq!(kept[0].text, "stay here");
    assert!(!kept[0].completed);
    assert!(todos.items_by_creation(&second.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_rejects_foreign_item_id_in_memory() {
    upsert_cannot_take_item_from_another_list(&MemoryStore::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_rejects_foreign_item_id_on_sqlite() {
    upsert_cannot_take_item_from_another_list(&SqliteStore::in_memory().await.unwrap()).await;
}
