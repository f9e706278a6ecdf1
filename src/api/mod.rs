//! HTTP server: JSON API, widget assets and the MCP endpoint.

mod handlers;
pub mod routes;
mod state;
mod static_assets;


use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::DocumentStore;
use crate::mcp::{TodoWidget, create_mcp_service};

pub use handlers::ErrorResponse;
pub use state::AppState;
pub use static_assets::widget_html;

/// Environment variable overriding the bind address.
pub const HOST_ENV: &str = "TODO_HOST";
/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "TODO_PORT";
/// Environment variable overriding the external base URL.
pub const BASE_URL_ENV: &str = "TODO_BASE_URL";

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin the server is reachable at; defaults to `http://localhost:<port>`
    pub base_url: Option<String>,
    /// Log verbosity (`-v` count)
    pub verbosity: u8,
    /// Serve Scalar API docs at `/docs`
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            base_url: None,
            verbosity: 0,
            enable_docs: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `TODO_HOST`, `TODO_PORT` and `TODO_BASE_URL`.
    /// Unparseable values are ignored.
    pub fn new() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var(HOST_ENV)
                .ok()
                .and_then(|host| host.parse().ok())
                .unwrap_or(defaults.host),
            port: std::env::var(PORT_ENV)
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            base_url: std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty()),
            ..defaults
        }
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_docs(mut self, enable_docs: bool) -> Self {
        self.enable_docs = enable_docs;
        self
    }

    /// Base URL without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

/// Server startup errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(todo_mcp::api::bind),
        help("Is another process using this port? Pick another with --port")
    )]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(todo_mcp::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Default log filter for a `-v` count. `RUST_LOG` takes precedence.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "todo_mcp=info,tower_http=info",
        1 => "todo_mcp=debug,tower_http=debug",
        _ => "todo_mcp=trace,tower_http=trace,rmcp=debug",
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing(verbosity: u8) {
    // Already initialized when embedded in a host process or test.
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbosity).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Build the full application: JSON API, widget assets and `/mcp`.
pub fn app<D: DocumentStore>(
    config: &Config,
    store: Arc<D>,
    cancellation_token: CancellationToken,
) -> axum::Router {
    let widget = TodoWidget::new(config.resolved_base_url());
    let mcp_service = create_mcp_service::<D>(Arc::clone(&store), widget, cancellation_token);

    routes::create_router(AppState::<D>::new(store), config.enable_docs)
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
}

/// Run the server until Ctrl-C.
pub async fn run<D: DocumentStore>(config: Config, store: D) -> Result<(), ApiError> {
    init_tracing(config.verbosity);

    let ct = CancellationToken::new();
    let app = app(&config, Arc::new(store), ct.clone());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("Todo server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ct))
        .await
        .map_err(ApiError::Serve)
}

async fn shutdown_signal(ct: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
    ct.cancel();
}
