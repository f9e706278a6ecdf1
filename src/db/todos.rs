//! Typed todo operations over any [`DocumentStore`].
//!
//! Both the HTTP API and the MCP tools go through this repository, so ids,
//! timestamps and list scoping are the same whichever surface wrote the data.

use std::collections::HashMap;

use serde_json::Value;

use crate::db::document::{
    BulkWriteResult, Filter, GroupPush, ID_FIELD, SortDirection, Update, UpsertOne,
};
use crate::db::models::{ITEMS, LISTS, from_document, to_document};
use crate::db::utils::{current_timestamp, generate_entity_id, generate_share_token};
use crate::db::{
    Collection, DbError, DbResult, DocumentStore, ItemSummary, ItemUpsert, ListWithItems, TodoItem,
    TodoList,
};

/// Todo lists and items stored in `store`.
pub struct TodoRepository<'a, D> {
    store: &'a D,
}

impl<'a, D: DocumentStore> TodoRepository<'a, D> {
    pub fn new(store: &'a D) -> Self {
        Self { store }
    }

    fn lists(&self) -> D::Collection {
        self.store.collection(LISTS)
    }

    fn items(&self) -> D::Collection {
        self.store.collection(ITEMS)
    }

    /// Create a list with a fresh id and share token.
    pub async fn create_list(&self, title: &str) -> DbResult<TodoList> {
        let list = TodoList {
            id: generate_entity_id(),
            title: title.to_string(),
            share_token: generate_share_token(),
            created_at: current_timestamp(),
        };
        self.lists().insert_one(to_document(&list)?).await?;
        Ok(list)
    }

    pub async fn get_list(&self, list_id: &str) -> DbResult<Option<TodoList>> {
        self.lists()
            .find_one(&Filter::by_id(list_id))
            .await?
            .map(from_document)
            .transpose()
    }

    /// Fetch a list, failing with `NotFound` when it does not exist.
    async fn require_list(&self, list_id: &str) -> DbResult<TodoList> {
        self.get_list(list_id)
            .await?
            .ok_or_else(|| DbError::NotFound {
                collection: LISTS.to_string(),
                id: list_id.to_string(),
            })
    }

    pub async fn lists_newest_first(&self) -> DbResult<Vec<TodoList>> {
        self.lists()
            .find(Filter::new())
            .sort("createdAt", SortDirection::Desc)
            .to_vec()
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    async fn items_sorted(&self, list_id: &str, field: &str) -> DbResult<Vec<TodoItem>> {
        self.items()
            .find(Filter::new().eq("listId", list_id))
            .sort(field, SortDirection::Asc)
            .to_vec()
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Items in manual order (the web view).
    pub async fn items_by_order(&self, list_id: &str) -> DbResult<Vec<TodoItem>> {
        self.items_sorted(list_id, "order").await
    }

    /// Items in creation order (the tool view).
    pub async fn items_by_creation(&self, list_id: &str) -> DbResult<Vec<TodoItem>> {
        self.items_sorted(list_id, "createdAt").await
    }

    /// Append an item. Its `order` is the list's current item count.
    pub async fn add_item(&self, list_id: &str, text: &str) -> DbResult<TodoItem> {
        self.require_list(list_id).await?;

        let items = self.items();
        let order = items.count(&Filter::new().eq("listId", list_id)).await?;
        let item = TodoItem {
            id: generate_entity_id(),
            list_id: list_id.to_string(),
            text: text.to_string(),
            completed: false,
            order: Some(i64::try_from(order).unwrap_or(i64::MAX)),
            created_at: current_timestamp(),
            updated_at: None,
        };
        items.insert_one(to_document(&item)?).await?;
        Ok(item)
    }

    fn item_filter(list_id: &str, item_id: &str) -> Filter {
        Filter::by_id(item_id).eq("listId", list_id)
    }

    /// Set the completed flag. Returns whether the item exists in the list.
    pub async fn set_completed(
        &self,
        list_id: &str,
        item_id: &str,
        completed: bool,
    ) -> DbResult<bool> {
        let update = Update::set("completed", completed).and_set("updatedAt", current_timestamp());
        let result = self
            .items()
            .update_one(&Self::item_filter(list_id, item_id), &update)
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Delete an item. Returns whether it existed in the list.
    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> DbResult<bool> {
        let result = self
            .items()
            .delete_one(&Self::item_filter(list_id, item_id))
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Create or update several items in one batch. Items without an id are
    /// created; items with an id are updated when they exist in the list and
    /// created under that id otherwise. An id owned by another list is
    /// `InvalidData` and nothing is written.
    pub async fn upsert_items(
        &self,
        list_id: &str,
        upserts: &[ItemUpsert],
    ) -> DbResult<(TodoList, BulkWriteResult)> {
        let list = self.require_list(list_id).await?;

        let items = self.items();
        for id in upserts.iter().filter_map(|upsert| upsert.id.as_deref()) {
            let owner = items
                .find_one(&Filter::by_id(id))
                .await?
                .and_then(|doc| doc.get("listId").and_then(Value::as_str).map(str::to_string));
            if let Some(owner) = owner
                && owner != list_id
            {
                return Err(DbError::InvalidData {
                    message: format!("item '{}' belongs to another list", id),
                    help: "omit the id to create a new item in this list".to_string(),
                });
            }
        }

        let base = items.count(&Filter::new().eq("listId", list_id)).await?;
        let now = current_timestamp();

        let ops = upserts
            .iter()
            .enumerate()
            .map(|(index, upsert)| {
                let id = upsert.id.clone().unwrap_or_else(generate_entity_id);
                let order = i64::try_from(base + index as u64).unwrap_or(i64::MAX);
                UpsertOne {
                    filter: Self::item_filter(list_id, &id),
                    update: Update::set(ID_FIELD, id.clone())
                        .and_set("listId", list_id)
                        .and_set("text", upsert.text.clone())
                        .and_set("completed", upsert.completed)
                        .and_set("updatedAt", now.clone())
                        .on_insert("createdAt", now.clone())
                        .on_insert("order", order),
                    upsert: true,
                }
            })
            .collect();

        let result = items.bulk_write(ops).await?;
        Ok((list, result))
    }

    /// Every item grouped by list id, from a single aggregation.
    pub async fn items_grouped_by_list(&self) -> DbResult<HashMap<String, Vec<ItemSummary>>> {
        let pipeline = GroupPush {
            group_by: "listId".to_string(),
            output: "items".to_string(),
            projection: [("id", ID_FIELD), ("text", "text"), ("completed", "completed")]
                .into_iter()
                .map(|(key, field)| (key.to_string(), field.to_string()))
                .collect(),
        }
        .to_pipeline();

        let groups = self.items().aggregate(&pipeline).await?;
        let mut by_list = HashMap::with_capacity(groups.len());
        for group in groups {
            let Some(list_id) = group.get(ID_FIELD).and_then(Value::as_str) else {
                continue;
            };
            let summaries = group
                .get("items")
                .and_then(Value::as_array)
                .map(|pushed| pushed.iter().filter_map(summary_from_projection).collect())
                .unwrap_or_default();
            by_list.insert(list_id.to_string(), summaries);
        }
        Ok(by_list)
    }

    /// All lists newest first, each with its own items.
    pub async fn lists_with_items(&self) -> DbResult<Vec<ListWithItems>> {
        let lists = self.lists_newest_first().await?;
        let mut grouped = self.items_grouped_by_list().await?;
        Ok(lists
            .into_iter()
            .map(|list| {
                let items = grouped.remove(&list.id).unwrap_or_default();
                ListWithItems { list, items }
            })
            .collect())
    }
}

fn summary_from_projection(value: &Value) -> Option<ItemSummary> {
    Some(ItemSummary {
        id: value.get("id")?.as_str()?.to_string(),
        text: value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        completed: value
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
