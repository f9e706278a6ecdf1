//! Domain models for todo lists.
//!
//! These are the persisted document shapes. Field names are camelCase on the
//! wire and in storage, with the primary key stored as `_id`.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::db::document::Document;
use crate::db::{DbError, DbResult};

/// Collection holding [`TodoList`] documents.
pub const LISTS: &str = "todo_lists";

/// Collection holding [`TodoItem`] documents.
pub const ITEMS: &str = "todo_items";

/// A titled, shareable todo list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Opaque token for unauthenticated link sharing.
    pub share_token: String,
    pub created_at: String,
}

/// One entry of a todo list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub list_id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Manual order key. Assigned from the item count on add; never
    /// renumbered after deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Item projection returned by the tool layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl From<TodoItem> for ItemSummary {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id,
            text: item.text,
            completed: item.completed,
        }
    }
}

/// Input for a bulk upsert. Items without `id` are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpsert {
    pub id: Option<String>,
    pub text: String,
    pub completed: bool,
}

/// A list together with the items grouped under it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWithItems {
    pub list: TodoList,
    pub items: Vec<ItemSummary>,
}

pub(crate) fn to_document<T: Serialize>(value: &T) -> DbResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(DbError::InvalidData {
            message: format!("expected an object, got {other}"),
            help: "documents must serialize to JSON objects".to_string(),
        }),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(doc: Document) -> DbResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
