//! SQLite implementation of the document store.
//!
//! Documents of every collection live in a single `documents` table as JSON
//! text; filters are translated to `json_extract` predicates.

mod collection;
mod connection;
mod helpers;

#[cfg(test)]
mod connection_test;

pub use collection::SqliteCollection;
pub use connection::SqliteStore;
