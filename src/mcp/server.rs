//! MCP server for todo lists.
//!
//! Tools live in [`super::tools`] as `#[tool_router]` impl blocks on
//! [`McpServer`]; this module joins their routers and exposes the widget as
//! the server's only resource.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{
        ListResourcesResult, PaginatedRequestParams, ReadResourceRequestParams,
        ReadResourceResult, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool_handler,
};
use tracing::debug;

use crate::db::DocumentStore;

use super::widget::TodoWidget;

/// MCP server coordinator, generic over the document store.
pub struct McpServer<D: DocumentStore> {
    store: Arc<D>,
    widget: TodoWidget,
    tool_router: ToolRouter<Self>,
}

// Derived Clone would require `D: Clone`.
impl<D: DocumentStore> Clone for McpServer<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            widget: self.widget.clone(),
            tool_router: self.tool_router.clone(),
        }
    }
}

impl<D: DocumentStore> McpServer<D> {
    pub fn new(store: impl Into<Arc<D>>, widget: TodoWidget) -> Self {
        Self {
            store: store.into(),
            widget,
            tool_router: Self::list_router() + Self::item_router(),
        }
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn widget(&self) -> &TodoWidget {
        &self.widget
    }

    pub fn router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }
}

#[tool_handler(router = self.tool_router)]
impl<D: DocumentStore> ServerHandler for McpServer<D> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(
            ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
        )
        .with_instructions(
            "Todo list server - create shareable todo lists, add, complete, delete and \
             upsert items. Results render in the todo list widget.",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![
            self.widget.resource(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        debug!(uri = %request.uri, "Reading resource");
        let contents = self.widget.read(&request.uri).await?;
        Ok(ReadResourceResult::new(vec![contents]))
    }
}
