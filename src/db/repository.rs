//! Storage traits.
//!
//! A [`DocumentStore`] hands out [`Collection`] handles. Every backend
//! implements the same document semantics (see [`crate::db::document`]), so
//! the todo repository and both surfaces are written once against these
//! traits.

use std::future::Future;

use crate::db::document::{
    BulkWriteResult, DeleteResult, Document, Filter, InsertOneResult, SortDirection, SortSpec,
    Update, UpdateResult, UpsertOne,
};
use crate::db::todos::TodoRepository;
use crate::db::DbResult;

/// A named collection of JSON documents.
pub trait Collection: Send + Sync {
    /// First document in storage order matching `filter`.
    fn find_one(&self, filter: &Filter) -> impl Future<Output = DbResult<Option<Document>>> + Send;

    /// All documents matching `filter`, optionally sorted by one field.
    ///
    /// Without a sort the result is in storage (insertion) order.
    fn find_sorted(
        &self,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> impl Future<Output = DbResult<Vec<Document>>> + Send;

    fn count(&self, filter: &Filter) -> impl Future<Output = DbResult<u64>> + Send;

    /// Store a document, generating `_id` when it is missing.
    fn insert_one(&self, doc: Document) -> impl Future<Output = DbResult<InsertOneResult>> + Send;

    /// Apply `update.set` to the first match. `set_on_insert` is ignored.
    fn update_one(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> impl Future<Output = DbResult<UpdateResult>> + Send;

    fn delete_one(&self, filter: &Filter) -> impl Future<Output = DbResult<DeleteResult>> + Send;

    /// Apply upserts in order.
    fn bulk_write(
        &self,
        ops: Vec<UpsertOne>,
    ) -> impl Future<Output = DbResult<BulkWriteResult>> + Send;

    /// Run a `$group`/`$push` pipeline. Unrecognized pipelines yield `[]`.
    fn aggregate(&self, pipeline: &[serde_json::Value])
    -> impl Future<Output = DbResult<Vec<Document>>> + Send;

    /// Start a query; chain [`Cursor::sort`] then [`Cursor::to_vec`].
    fn find(&self, filter: Filter) -> Cursor<'_, Self>
    where
        Self: Sized,
    {
        Cursor {
            collection: self,
            filter,
            sort: None,
        }
    }
}

/// Pending `find` query.
pub struct Cursor<'a, C> {
    collection: &'a C,
    filter: Filter,
    sort: Option<SortSpec>,
}

impl<C: Collection> Cursor<'_, C> {
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    pub async fn to_vec(self) -> DbResult<Vec<Document>> {
        self.collection
            .find_sorted(&self.filter, self.sort.as_ref())
            .await
    }
}

/// A document database: a set of named collections.
pub trait DocumentStore: Send + Sync + 'static {
    type Collection: Collection;

    /// Handle to a collection. Collections exist implicitly.
    fn collection(&self, name: &str) -> Self::Collection;

    /// Short name of the backend actually serving requests.
    fn backend(&self) -> &'static str;

    /// Typed todo operations on top of this store.
    fn todos(&self) -> TodoRepository<'_, Self>
    where
        Self: Sized,
    {
        TodoRepository::new(self)
    }
}
