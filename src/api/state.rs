//! Application state for the API server.

use std::sync::Arc;

use crate::db::DocumentStore;

/// Shared application state.
///
/// Generic over `D: DocumentStore`; tests inject a `MemoryStore`, the server
/// a `FallbackStore`.
pub struct AppState<D: DocumentStore> {
    store: Arc<D>,
}

// Manual Clone impl - only the Arc needs cloning, not D
impl<D: DocumentStore> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<D: DocumentStore> AppState<D> {
    pub fn new(store: impl Into<Arc<D>>) -> Self {
        Self {
            store: store.into(),
        }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &D {
        &self.store
    }
}
