//! Serve command - starts the JSON API, widget assets and MCP endpoint

use std::net::IpAddr;

use miette::{IntoDiagnostic, Result};

use crate::api::{self, Config};
use crate::db::{DocumentStore, FallbackStore};

/// Environment variable naming the SQLite database.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Command-line overrides for the server. Unset fields fall back to the
/// environment, then to defaults.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub base_url: Option<String>,
    pub verbosity: u8,
    pub enable_docs: bool,
}

/// Server config: CLI flag > env var > default.
pub fn resolve_config(args: &ServeArgs) -> Config {
    let mut config = Config::new()
        .with_verbosity(args.verbosity)
        .with_docs(args.enable_docs);
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    config
}

/// Database URL from the flag, else `DATABASE_URL`. Blank values count as unset.
pub fn resolve_database_url(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(DATABASE_URL_ENV).ok())
        .filter(|url| !url.trim().is_empty())
}

/// Run the server until Ctrl-C
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args);
    let database_url = resolve_database_url(args.database_url);

    // Started early so store selection is logged
    api::init_tracing(config.verbosity);

    let store = FallbackStore::connect(database_url.as_deref()).await;

    let base_url = config.resolved_base_url();
    println!();
    println!("todo-mcp server starting...");
    println!("   API:    {}/api/todos", base_url);
    println!("   MCP:    {}/mcp", base_url);
    println!("   Widget: {}/todos/widget", base_url);
    if config.enable_docs {
        println!("   Docs:   {}/docs", base_url);
    }
    println!();
    println!("   Store:  {}", store.backend());
    println!();

    api::run(config, store).await.into_diagnostic()?;

    Ok(())
}
