//! SQLite collection handle.

use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::helpers::{map_sqlx_error, parse_body, push_filter};
use crate::db::document::{
    BulkWriteResult, DeleteResult, Document, Filter, GroupPush, InsertOneResult, SortSpec, Update,
    UpdateResult, UpsertOne, document_id, ensure_id, sort_documents,
};
use crate::db::{Collection, DbError, DbResult};

/// Documents of one collection, stored as JSON rows in `documents`.
#[derive(Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
    name: String,
}

impl SqliteCollection {
    pub(crate) fn new(pool: SqlitePool, name: &str) -> Self {
        Self {
            pool,
            name: name.to_string(),
        }
    }

    async fn select(&self, filter: &Filter, limit: Option<i64>) -> DbResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT body FROM documents");
        push_filter(&mut qb, &self.name, filter)?;
        qb.push(" ORDER BY seq");
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let bodies: Vec<(String,)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        bodies.iter().map(|(body,)| parse_body(body)).collect()
    }

    async fn insert(&self, conn: &mut SqliteConnection, id: &str, doc: &Document) -> DbResult<()> {
        let body = serde_json::to_string(doc)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(&self.name)
            .bind(id)
            .bind(body)
            .execute(&mut *conn)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DbError::AlreadyExists {
                        collection: self.name.clone(),
                        id: id.to_string(),
                    }
                }
                other => map_sqlx_error(other),
            })?;
        Ok(())
    }

    /// Apply `update.set` to the first match. Returns whether one matched.
    async fn update_first(
        &self,
        conn: &mut SqliteConnection,
        filter: &Filter,
        update: &Update,
    ) -> DbResult<bool> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT seq, body FROM documents");
        push_filter(&mut qb, &self.name, filter)?;
        qb.push(" ORDER BY seq LIMIT 1");

        let row: Option<(i64, String)> = qb
            .build_query_as()
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        let Some((seq, body)) = row else {
            return Ok(false);
        };

        let mut doc = parse_body(&body)?;
        update.apply_to(&mut doc);
        let body = serde_json::to_string(&doc)?;

        sqlx::query("UPDATE documents SET body = ? WHERE seq = ?")
            .bind(body)
            .bind(seq)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(true)
    }
}

impl Collection for SqliteCollection {
    async fn find_one(&self, filter: &Filter) -> DbResult<Option<Document>> {
        Ok(self.select(filter, Some(1)).await?.into_iter().next())
    }

    async fn find_sorted(
        &self,
        filter: &Filter,
        sort: Option<&SortSpec>,
    ) -> DbResult<Vec<Document>> {
        let mut docs = self.select(filter, None).await?;
        // Sorted here rather than in SQL so ordering across JSON types
        // matches the in-memory store exactly.
        if let Some(spec) = sort {
            sort_documents(&mut docs, spec);
        }
        Ok(docs)
    }

    async fn count(&self, filter: &Filter) -> DbResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM documents");
        push_filter(&mut qb, &self.name, filter)?;

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn insert_one(&self, mut doc: Document) -> DbResult<InsertOneResult> {
        let id = ensure_id(&mut doc);
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        self.insert(&mut conn, &id, &doc).await?;
        Ok(InsertOneResult { inserted_id: id })
    }

    async fn update_one(&self, filter: &Filter, update: &Update) -> DbResult<UpdateResult> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        let matched = self.update_first(&mut conn, filter, update).await?;
        Ok(UpdateResult {
            matched_count: u64::from(matched),
        })
    }

    async fn delete_one(&self, filter: &Filter) -> DbResult<DeleteResult> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "DELETE FROM documents WHERE seq = (SELECT seq FROM documents",
        );
        push_filter(&mut qb, &self.name, filter)?;
        qb.push(" ORDER BY seq LIMIT 1)");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    async fn bulk_write(&self, ops: Vec<UpsertOne>) -> DbResult<BulkWriteResult> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut result = BulkWriteResult::default();

        for op in &ops {
            if self.update_first(&mut tx, &op.filter, &op.update).await? {
                result.matched_count += 1;
            } else if op.upsert {
                let doc = op.update.upsert_document(&op.filter);
                if let Some(id) = document_id(&doc) {
                    self.insert(&mut tx, &id, &doc).await?;
                    result.upserted_count += 1;
                }
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(result)
    }

    async fn aggregate(&self, pipeline: &[Value]) -> DbResult<Vec<Document>> {
        let Some(group) = GroupPush::parse(pipeline) else {
            return Ok(Vec::new());
        };
        let docs = self.select(&Filter::new(), None).await?;
        Ok(group.apply(docs.iter()))
    }
}
