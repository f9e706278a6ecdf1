//! Store selection with in-memory fallback.
//!
//! The database is chosen once at startup. When no URL is configured the
//! in-memory store serves everything. When a URL is configured but the
//! database cannot be reached, every call logs a warning and is served by a
//! lazily created in-memory store that lives for the rest of the process.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{info, warn};

use crate::db::document::{
    BulkWriteResult, DeleteResult, Document, Filter, InsertOneResult, SortSpec, Update,
    UpdateResult, UpsertOne,
};
use crate::db::memory::{MemoryCollection, MemoryStore};
use crate::db::sqlite::{SqliteCollection, SqliteStore};
use crate::db::{Collection, DbError, DbResult, DocumentStore};

/// The store the server runs on.
#[derive(Clone, Default)]
pub struct FallbackStore {
    primary: Option<SqliteStore>,
    /// A database URL was configured, so falling back is worth a warning.
    configured: bool,
    memory: Arc<OnceLock<MemoryStore>>,
}

impl FallbackStore {
    /// Select the backend for `database_url`. Never fails: an unreachable
    /// database degrades to the in-memory store.
    pub async fn connect(database_url: Option<&str>) -> Self {
        let Some(url) = database_url.map(str::trim).filter(|url| !url.is_empty()) else {
            info!("DATABASE_URL not set, using in-memory store");
            return Self::memory_only();
        };

        match SqliteStore::connect(url).await {
            Ok(store) => {
                info!(url = %url, "Connected to SQLite database");
                Self::with_primary(store)
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to database, falling back to in-memory store");
                Self {
                    primary: None,
                    configured: true,
                    memory: Arc::default(),
                }
            }
        }
    }

    pub fn memory_only() -> Self {
        Self::default()
    }

    pub fn with_primary(store: SqliteStore) -> Self {
        Self {
            primary: Some(store),
            configured: true,
            memory: Arc::default(),
        }
    }
}

impl DocumentStore for FallbackStore {
    type Collection = FallbackCollection;

    fn collection(&self, name: &str) -> FallbackCollection {
        FallbackCollection {
            primary: self.primary.as_ref().map(|store| store.collection(name)),
            configured: self.configured,
            memory: Arc::clone(&self.memory),
            name: name.to_string(),
        }
    }

    fn backend(&self) -> &'static str {
        match &self.primary {
            Some(store) => store.backend(),
            None => "memory",
        }
    }
}

/// Collection handle that retries on the in-memory store when the database
/// reports a connection failure.
pub struct FallbackCollection {
    primary: Option<SqliteCollection>,
    configured: bool,
    memory: Arc<OnceLock<MemoryStore>>,
    name: String,
}

impl FallbackCollection {
    fn memory(&self) -> MemoryCollection {
        self.memory
            .get_or_init(MemoryStore::new)
            .collection(&self.name)
    }
}

/// Run `$call` with `$coll` bound to the database collection, or to the
/// in-memory collection when the database is missing or unreachable.
macro_rules! with_fallback {
    ($self:ident, $coll:ident => $call:expr) => {{
        match &$self.primary {
            Some($coll) => match $call {
                Err(DbError::Connection { message }) => {
                    warn!(
                        collection = %$self.name,
                        error = %message,
                        "Database unreachable, using in-memory store"
                    );
                    let $coll = $self.memory();
                    $call
                }
                other => other,
            },
            None => {
                if $self.configured {
                    warn!(collection = %$self.name, "Database unavailable, using in-memory store");
                }
                let $coll = $self.memory();
                $call
            }
        }
    }};
}

impl Collection for FallbackCollection {
    async fn find_one(&self, filter: &Filter) -> DbResult<Option<Document>> {
        with_fallback!(self, coll => coll.find_one(filter).await)
    }

    async fn find_sorted(
        &self,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> DbResult<Vec<Document>> {
        with_fallback!(self, coll => coll.find_sorted(filter, sort).await)
    }

    async fn count(&self, filter: &Filter) -> DbResult<u64> {
        with_fallback!(self, coll => coll.count(filter).await)
    }

    async fn insert_one(&self, doc: Document) -> DbResult<InsertOneResult> {
        with_fallback!(self, coll => coll.insert_one(doc.clone()).await)
    }

    async fn update_one(&self, filter: &Filter, update: &Update) -> DbResult<UpdateResult> {
        with_fallback!(self, coll => coll.update_one(filter, update).await)
    }

    async fn delete_one(&self, filter: &Filter) -> DbResult<DeleteResult> {
        with_fallback!(self, coll => coll.delete_one(filter).await)
    }

    async fn bulk_write(&self, ops: Vec<UpsertOne>) -> DbResult<BulkWriteResult> {
        with_fallback!(self, coll => coll.bulk_write(ops.clone()).await)
    }

    async fn aggregate(&self, pipeline: &[Value]) -> DbResult<Vec<Document>> {
        with_fallback!(self, coll => coll.aggregate(pipeline).await)
    }
}
