//! Document storage for todo lists.
//!
//! # Architecture
//!
//! - `document`: filters, updates, sorting and grouping shared by backends
//! - `repository`: the `DocumentStore` and `Collection` traits
//! - `memory` / `sqlite`: the two backends
//! - `fallback`: picks a backend at startup and degrades to memory
//! - `todos`: typed list and item operations used by the API and MCP tools

pub mod document;
mod error;
mod fallback;
mod memory;
mod models;
mod repository;
pub mod sqlite;
mod todos;
pub mod utils;

#[cfg(test)]
mod document_test;
#[cfg(test)]
mod error_test;
#[cfg(test)]
mod fallback_test;
#[cfg(test)]
mod todos_test;

pub use document::Document;
pub use error::{DbError, DbResult};
pub use fallback::{FallbackCollection, FallbackStore};
pub use memory::{MemoryCollection, MemoryStore};
pub use models::*;
pub use repository::*;
pub use sqlite::{SqliteCollection, SqliteStore};
pub use todos::TodoRepository;
