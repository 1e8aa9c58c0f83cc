//! Postgres-backed [`DocumentStore`].
//!
//! Each collection is a table of `(id TEXT PRIMARY KEY, body JSONB)` rows
//! created by the workspace migrations. Upserts merge top-level fields with
//! the `jsonb || jsonb` operator, so fields absent from the update survive.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::store::{Collection, Document, DocumentStore};
use crate::StoreError;

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        // Table names come from `Collection::name`, never from caller input.
        let sql = format!("SELECT body FROM {} WHERE id = $1", collection.name());

        let body: Option<Value> = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match body {
            None => Ok(None),
            Some(Value::Object(document)) => Ok(Some(document)),
            Some(_) => Err(StoreError::MalformedDocument {
                collection,
                id: id.to_string(),
            }),
        }
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let table = collection.name();
        let sql = format!(
            "INSERT INTO {table} (id, body) \
             VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET \
                 body       = {table}.body || EXCLUDED.body, \
                 updated_at = NOW()"
        );

        sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
