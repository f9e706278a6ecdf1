//! List-level tools: create, read one, read all.

use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{map_db_error, require_non_empty, summaries, tool_result};
use crate::db::DocumentStore;
use crate::mcp::McpServer;
use crate::mcp::widget::tool_meta;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTodoListParams {
    #[schemars(description = "Title of the new todo list", length(min = 1))]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTodoListParams {
    #[schemars(description = "ID of the todo list", length(min = 1))]
    pub list_id: String,
}

#[tool_router(router = list_router, vis = "pub(crate)")]
impl<D: DocumentStore> McpServer<D> {
    /// Create a list
    #[tool(
        description = "Create a new todo list with a title. Returns the list ID and share token.",
        annotations(title = "Create todo list", read_only_hint = false, destructive_hint = false),
        meta = tool_meta()
    )]
    pub async fn create_todo_list(
        &self,
        params: Parameters<CreateTodoListParams>,
    ) -> Result<CallToolResult, McpError> {
        let title = params.0.title.trim();
        require_non_empty("title", title)?;

        let list = self
            .store()
            .todos()
            .create_list(title)
            .await
            .map_err(map_db_error)?;

        Ok(tool_result(
            format!("Created todo list: {}", list.title),
            json!({
                "listId": list.id,
                "title": list.title,
                "shareToken": list.share_token,
                "items": [],
            }),
        ))
    }

    /// Read one list
    #[tool(
        description = "Get a todo list and its items in the order they were added",
        annotations(title = "Get todo list", read_only_hint = true),
        meta = tool_meta()
    )]
    pub async fn get_todo_list(
        &self,
        params: Parameters<GetTodoListParams>,
    ) -> Result<CallToolResult, McpError> {
        let list_id = params.0.list_id;
        require_non_empty("listId", &list_id)?;

        let todos = self.store().todos();
        let list = todos.get_list(&list_id).await.map_err(map_db_error)?;
        let items = todos
            .items_by_creation(&list_id)
            .await
            .map_err(map_db_error)?;

        let title = list.map(|list| list.title);
        Ok(tool_result(
            format!("Todo list: {}", title.as_deref().unwrap_or("Unknown")),
            json!({
                "listId": list_id,
                "title": title,
                "items": summaries(items),
            }),
        ))
    }

    /// Read every list
    #[tool(
        description = "List all todo lists, newest first, each with its items",
        annotations(title = "List todo lists", read_only_hint = true),
        meta = tool_meta()
    )]
    pub async fn list_todo_lists(&self) -> Result<CallToolResult, McpError> {
        let lists = self
            .store()
            .todos()
            .lists_with_items()
            .await
            .map_err(map_db_error)?;

        let count = lists.len();
        let lists: Vec<_> = lists
            .into_iter()
            .map(|entry| {
                json!({
                    "id": entry.list.id,
                    "title": entry.list.title,
                    "shareToken": entry.list.share_token,
                    "createdAt": entry.list.created_at,
                    "items": entry.items,
                })
            })
            .collect();

        let noun = if count == 1 { "list" } else { "lists" };
        Ok(tool_result(
            format!("Found {} todo {}", count, noun),
            json!({ "lists": lists }),
        ))
    }
}
