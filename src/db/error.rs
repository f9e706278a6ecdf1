//! Database error types.
//!
//! This module provides abstracted error types for document store operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Document store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Document not found: {collection} with id '{id}'")]
    #[diagnostic(code(todo_mcp::db::not_found))]
    NotFound { collection: String, id: String },

    #[error("Document already exists: {collection} with id '{id}'")]
    #[diagnostic(code(todo_mcp::db::already_exists))]
    AlreadyExists { collection: String, id: String },

    #[error("Invalid data: {message} (hint: {help})")]
    #[diagnostic(code(todo_mcp::db::invalid_data))]
    InvalidData { message: String, help: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(todo_mcp::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(todo_mcp::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(
        code(todo_mcp::db::connection_error),
        help("Check DATABASE_URL, or unset it to run with the in-memory store")
    )]
    Connection { message: String },
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::InvalidData {
            message: e.to_string(),
            help: "stored documents must match the todo list/item shapes".to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
