//! Todo list widget resource.
//!
//! Tools point clients at `ui://widget/todo-list.html` through their `_meta`.
//! Reading that resource fetches the widget page from the server's own
//! `/todos/widget` route, so the HTML served over MCP is always the deployed
//! copy.

use rmcp::{
    ErrorData as McpError,
    model::{AnnotateAble, Meta, RawResource, Resource, ResourceContents},
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::api::widget_html;

/// URI the widget is registered under.
pub const WIDGET_URI: &str = "ui://widget/todo-list.html";

/// MIME type for HTML widgets rendered by the client.
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

/// Path of the widget page on the HTTP server.
pub const WIDGET_PATH: &str = "/todos/widget";

fn to_meta(value: Value) -> Meta {
    match value {
        Value::Object(map) => Meta(map),
        _ => Meta::new(),
    }
}

/// `_meta` attached to every tool and tool result.
pub fn tool_meta() -> Meta {
    to_meta(json!({
        "securitySchemes": [{ "type": "noauth" }],
        "openai/outputTemplate": WIDGET_URI,
        "openai/toolInvocation/invoking": "Loading todo list...",
        "openai/toolInvocation/invoked": "Todo list loaded",
        "openai/widgetAccessible": false,
        "openai/resultCanProduceWidget": true,
    }))
}

/// The widget resource, bound to the server's external base URL.
#[derive(Clone)]
pub struct TodoWidget {
    base_url: String,
    client: reqwest::Client,
}

impl TodoWidget {
    pub fn new(base_url: impl Into<String>) -> Self {
        // reqwest is built without a default TLS provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scheme, host and port of the base URL.
    pub fn origin(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// `_meta` describing how the client may render the widget.
    pub fn resource_meta(&self) -> Meta {
        let origin = self.origin();
        to_meta(json!({
            "openai/widgetDescription": "Displays an interactive todo list",
            "openai/widgetPrefersBorder": true,
            "openai/widgetCSP": {
                "connect_domains": [origin],
                "resource_domains": [origin],
            },
            "openai/widgetDomain": origin,
        }))
    }

    /// Resource listing entry.
    pub fn resource(&self) -> Resource {
        let mut raw = RawResource::new(WIDGET_URI, "todo-list-widget");
        raw.title = Some("Todo list".to_string());
        raw.description = Some("Interactive todo list widget".to_string());
        raw.mime_type = Some(WIDGET_MIME_TYPE.to_string());
        raw.meta = Some(self.resource_meta());
        raw.no_annotation()
    }

    async fn fetch_html(&self) -> Result<String, reqwest::Error> {
        let url = format!("{}{}", self.base_url, WIDGET_PATH);
        debug!(url = %url, "Fetching widget HTML");
        self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Widget page, preferring the copy served at the base URL and falling
    /// back to the one embedded in this binary.
    pub async fn html(&self) -> Result<String, McpError> {
        match self.fetch_html().await {
            Ok(html) => Ok(html),
            Err(e) => {
                warn!(error = %e, base_url = %self.base_url, "Widget fetch failed, using embedded copy");
                widget_html().ok_or_else(|| {
                    McpError::internal_error(
                        "widget_unavailable",
                        Some(json!({"error": e.to_string()})),
                    )
                })
            }
        }
    }

    /// Contents for `resources/read`. Unknown URIs are `resource_not_found`.
    pub async fn read(&self, uri: &str) -> Result<ResourceContents, McpError> {
        if uri != WIDGET_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                None,
            ));
        }

        Ok(ResourceContents::TextResourceContents {
            uri: WIDGET_URI.to_string(),
            mime_type: Some(WIDGET_MIME_TYPE.to_string()),
            text: self.html().await?,
            meta: Some(self.resource_meta()),
        })
    }
}
