//! MCP tool implementations
//!
//! Tools are split by what they act on: `lists` creates and reads whole
//! lists, `items` mutates the items inside one. Both are `#[tool_router]`
//! impl blocks on [`McpServer`](crate::mcp::McpServer), combined into one
//! router by the server.

mod items;
mod lists;


pub use items::*;
pub use lists::*;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde_json::{Value, json};
use tracing::error;

use crate::db::{DbError, ItemSummary, TodoItem};
use crate::mcp::widget::tool_meta;

/// Map a store error to an MCP error.
pub(crate) fn map_db_error(e: DbError) -> McpError {
    match e {
        DbError::NotFound { collection, id } => McpError::resource_not_found(
            format!("Todo list not found: {}", id),
            Some(json!({"collection": collection, "id": id})),
        ),
        DbError::InvalidData { message, .. } => McpError::invalid_params(message, None),
        e => {
            error!(error = %e, "Store operation failed");
            McpError::internal_error("database_error", Some(json!({"error": e.to_string()})))
        }
    }
}

/// Reject blank strings before touching the store.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        Err(McpError::invalid_params(
            format!("{} must not be empty", field),
            Some(json!({"field": field})),
        ))
    } else {
        Ok(())
    }
}

/// Successful tool result: a one-line summary for the model, the structured
/// payload for the widget, and the widget `_meta`.
pub(crate) fn tool_result(summary: impl Into<String>, structured: Value) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(summary.into())]);
    result.structured_content = Some(structured);
    result.meta = Some(tool_meta());
    result
}

pub(crate) fn summaries(items: Vec<TodoItem>) -> Vec<ItemSummary> {
    items.into_iter().map(ItemSummary::from).collect()
}
