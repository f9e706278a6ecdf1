//! Model Context Protocol (MCP) server
//!
//! Served over Streamable HTTP at `/mcp`. Exposes the todo tools and the
//! todo list widget resource.
//!
//! - **server**: [`McpServer`], joining the tool routers and serving resources
//! - **tools**: list and item tools
//! - **widget**: widget resource and the `_meta` that points tools at it

pub mod server;
mod service;
pub mod tools;
pub mod widget;

#[cfg(test)]
mod widget_test;

pub use server::McpServer;
pub use service::create_mcp_service;
pub use widget::TodoWidget;
