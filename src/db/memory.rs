//! In-process document store.
//!
//! Collections are `dashmap` maps keyed by `_id`. Each entry carries an
//! insertion sequence number that defines storage order. Inserting an
//! existing `_id` replaces the document in place instead of failing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use crate::db::DbResult;
use crate::db::document::{
    BulkWriteResult, DeleteResult, Document, Filter, GroupPush, InsertOneResult, SortSpec, Update,
    UpdateResult, UpsertOne, document_id, ensure_id, sort_documents,
};
use crate::db::repository::{Collection, DocumentStore};

/// Document store held entirely in memory. Cloning shares the data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    type Collection = MemoryCollection;

    fn collection(&self, name: &str) -> MemoryCollection {
        self.collections
            .entry(name.to_string())
            .or_default()
            .value()
            .clone()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[derive(Clone)]
struct StoredDocument {
    seq: u64,
    doc: Document,
}

/// Handle to one in-memory collection.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    docs: Arc<DashMap<String, StoredDocument>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryCollection {
    /// Matching `(id, document)` pairs in storage order.
    fn matching(&self, filter: &Filter) -> Vec<(String, Document)> {
        let mut hits: Vec<(u64, String, Document)> = self
            .docs
            .iter()
            .filter(|entry| filter.matches(&entry.value().doc))
            .map(|entry| (entry.value().seq, entry.key().clone(), entry.value().doc.clone()))
            .collect();
        hits.sort_by_key(|(seq, _, _)| *seq);
        hits.into_iter().map(|(_, id, doc)| (id, doc)).collect()
    }

    fn first_match_id(&self, filter: &Filter) -> Option<String> {
        self.docs
            .iter()
            .filter(|entry| filter.matches(&entry.value().doc))
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone())
    }

    fn store(&self, id: String, doc: Document) {
        match self.docs.entry(id) {
            Entry::Occupied(mut existing) => existing.get_mut().doc = doc,
            Entry::Vacant(slot) => {
                slot.insert(StoredDocument {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    doc,
                });
            }
        }
    }

    fn apply_update(&self, filter: &Filter, update: &Update) -> bool {
        let Some(id) = self.first_match_id(filter) else {
            return false;
        };
        match self.docs.get_mut(&id) {
            Some(mut stored) => {
                update.apply_to(&mut stored.doc);
                true
            }
            // Deleted between lookup and update.
            None => false,
        }
    }
}

impl Collection for MemoryCollection {
    async fn find_one(&self, filter: &Filter) -> DbResult<Option<Document>> {
        Ok(self
            .first_match_id(filter)
            .and_then(|id| self.docs.get(&id).map(|stored| stored.doc.clone())))
    }

    async fn find_sorted(
        &self,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> DbResult<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .matching(filter)
            .into_iter()
            .map(|(_, doc)| doc)
            .collect();
        if let Some(spec) = sort {
            sort_documents(&mut docs, spec);
        }
        Ok(docs)
    }

    async fn count(&self, filter: &Filter) -> DbResult<u64> {
        Ok(self
            .docs
            .iter()
            .filter(|entry| filter.matches(&entry.value().doc))
            .count() as u64)
    }

    async fn insert_one(&self, mut doc: Document) -> DbResult<InsertOneResult> {
        let id = ensure_id(&mut doc);
        self.store(id.clone(), doc);
        Ok(InsertOneResult { inserted_id: id })
    }

    async fn update_one(&self, filter: &Filter, update: &Update) -> DbResult<UpdateResult> {
        let matched = self.apply_update(filter, update);
        Ok(UpdateResult {
            matched_count: u64::from(matched),
        })
    }

    async fn delete_one(&self, filter: &Filter) -> DbResult<DeleteResult> {
        let deleted = self
            .first_match_id(filter)
            .and_then(|id| self.docs.remove(&id))
            .is_some();
        Ok(DeleteResult {
            deleted_count: u64::from(deleted),
        })
    }

    async fn bulk_write(&self, ops: Vec<UpsertOne>) -> DbResult<BulkWriteResult> {
        let mut result = BulkWriteResult::default();
        for op in ops {
            if self.apply_update(&op.filter, &op.update) {
                result.matched_count += 1;
            } else if op.upsert {
                let doc = op.update.upsert_document(&op.filter);
                if let Some(id) = document_id(&doc) {
                    self.store(id, doc);
                    result.upserted_count += 1;
                }
            }
        }
        Ok(result)
    }

    async fn aggregate(&self, pipeline: &[Value]) -> DbResult<Vec<Document>> {
        let Some(group) = GroupPush::parse(pipeline) else {
            return Ok(Vec::new());
        };
        let docs: Vec<Document> = self
            .matching(&Filter::new())
            .into_iter()
            .map(|(_, doc)| doc)
            .collect();
        Ok(group.apply(docs.iter()))
    }
}
