//! Item-level tools. Every result carries the list's items in creation order.

use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{map_db_error, require_non_empty, summaries, tool_result};
use crate::db::{DbResult, DocumentStore, ItemSummary, ItemUpsert};
use crate::mcp::McpServer;
use crate::mcp::widget::tool_meta;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoItemParams {
    #[schemars(description = "ID of the todo list", length(min = 1))]
    pub list_id: String,
    #[schemars(description = "Text of the new item", length(min = 1))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRefParams {
    #[schemars(description = "ID of the todo list", length(min = 1))]
    pub list_id: String,
    #[schemars(description = "ID of the item within the list", length(min = 1))]
    pub item_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertItem {
    #[schemars(description = "Existing item ID to update. Omit to create a new item.")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[schemars(description = "Item text", length(min = 1))]
    pub text: String,
    #[schemars(description = "Whether the item is done (default false)")]
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTodoItemsParams {
    #[schemars(description = "ID of the todo list", length(min = 1))]
    pub list_id: String,
    #[schemars(description = "Items to create or update", length(min = 1))]
    pub items: Vec<UpsertItem>,
}

impl<D: DocumentStore> McpServer<D> {
    async fn current_items(&self, list_id: &str) -> DbResult<Vec<ItemSummary>> {
        Ok(summaries(
            self.store().todos().items_by_creation(list_id).await?,
        ))
    }
}

#[tool_router(router = item_router, vis = "pub(crate)")]
impl<D: DocumentStore> McpServer<D> {
    #[tool(
        description = "Add an item to the end of a todo list",
        annotations(title = "Add todo item", read_only_hint = false, destructive_hint = false),
        meta = tool_meta()
    )]
    pub async fn add_todo_item(
        &self,
        params: Parameters<AddTodoItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let AddTodoItemParams { list_id, text } = params.0;
        require_non_empty("listId", &list_id)?;
        require_non_empty("text", &text)?;

        let item = self
            .store()
            .todos()
            .add_item(&list_id, &text)
            .await
            .map_err(map_db_error)?;
        let items = self.current_items(&list_id).await.map_err(map_db_error)?;

        Ok(tool_result(
            format!("Added item: {}", item.text),
            json!({ "listId": list_id, "items": items }),
        ))
    }

    #[tool(
        description = "Mark an item in a todo list as completed",
        annotations(
            title = "Complete todo item",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true
        ),
        meta = tool_meta()
    )]
    pub async fn complete_todo_item(
        &self,
        params: Parameters<ItemRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let ItemRefParams { list_id, item_id } = params.0;
        require_non_empty("listId", &list_id)?;
        require_non_empty("itemId", &item_id)?;

        let found = self
            .store()
            .todos()
            .set_completed(&list_id, &item_id, true)
            .await
            .map_err(map_db_error)?;
        if !found {
            debug!(list_id = %list_id, item_id = %item_id, "No item to complete");
        }
        let items = self.current_items(&list_id).await.map_err(map_db_error)?;

        Ok(tool_result(
            "Completed item",
            json!({ "listId": list_id, "items": items }),
        ))
    }

    #[tool(
        description = "Remove an item from a todo list",
        annotations(title = "Delete todo item", read_only_hint = false, destructive_hint = true),
        meta = tool_meta()
    )]
    pub async fn delete_todo_item(
        &self,
        params: Parameters<ItemRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let ItemRefParams { list_id, item_id } = params.0;
        require_non_empty("listId", &list_id)?;
        require_non_empty("itemId", &item_id)?;

        let found = self
            .store()
            .todos()
            .delete_item(&list_id, &item_id)
            .await
            .map_err(map_db_error)?;
        if !found {
            debug!(list_id = %list_id, item_id = %item_id, "No item to delete");
        }
        let items = self.current_items(&list_id).await.map_err(map_db_error)?;

        Ok(tool_result(
            "Deleted item",
            json!({ "listId": list_id, "items": items }),
        ))
    }

    #[tool(
        description = "Create or update several items in a todo list at once. \
                       Items with an id replace that item's text and completed flag; \
                       items without an id are created.",
        annotations(title = "Upsert todo items", read_only_hint = false, destructive_hint = false),
        meta = tool_meta()
    )]
    pub async fn upsert_todo_items(
        &self,
        params: Parameters<UpsertTodoItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let UpsertTodoItemsParams { list_id, items } = params.0;
        require_non_empty("listId", &list_id)?;
        if items.is_empty() {
            return Err(McpError::invalid_params(
                "items must contain at least one item",
                Some(json!({"field": "items"})),
            ));
        }

        let mut upserts = Vec::with_capacity(items.len());
        for item in items {
            require_non_empty("text", &item.text)?;
            if let Some(id) = &item.id {
                require_non_empty("id", id)?;
            }
            upserts.push(ItemUpsert {
                id: item.id,
                text: item.text,
                completed: item.completed,
            });
        }

        let (list, result) = self
            .store()
            .todos()
            .upsert_items(&list_id, &upserts)
            .await
            .map_err(map_db_error)?;
        debug!(
            matched = result.matched_count,
            upserted = result.upserted_count,
            "Upserted todo items"
        );
        let items = self.current_items(&list_id).await.map_err(map_db_error)?;

        Ok(tool_result(
            format!("Upserted {} item(s) in \"{}\"", upserts.len(), list.title),
            json!({ "listId": list_id, "title": list.title, "items": items }),
        ))
    }
}
