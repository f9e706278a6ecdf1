//! MCP Streamable HTTP service creation

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::db::DocumentStore;

use super::server::McpServer;
use super::widget::TodoWidget;

/// Create the Streamable HTTP service, ready to nest under `/mcp`.
///
/// Every session gets its own [`McpServer`] sharing `store` and `widget`.
pub fn create_mcp_service<D: DocumentStore>(
    store: impl Into<Arc<D>>,
    widget: TodoWidget,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<D>, LocalSessionManager> {
    let store = store.into();

    // rmcp expects the factory to fail with io::Error
    let service_factory = move || -> Result<McpServer<D>, std::io::Error> {
        Ok(McpServer::<D>::new(Arc::clone(&store), widget.clone()))
    };

    let config = StreamableHttpServerConfig::default()
        .with_sse_keep_alive(None)
        .with_sse_retry(None)
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
