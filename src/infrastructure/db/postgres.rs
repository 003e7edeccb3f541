use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{Document, DocumentError, DocumentStore};

/// Metadata store backed by a single JSONB table. The editor's collections
/// carry no schema, so one `documents` relation with a containment index
/// covers all of them.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;

        info!("✅ Connected to PostgreSQL");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                collection TEXT NOT NULL,
                fields JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents (collection, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS documents_fields_idx ON documents USING GIN (fields)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_document(&self, collection: &str, fields: Value) -> Result<String, DocumentError> {
        let row = sqlx::query("INSERT INTO documents (collection, fields) VALUES ($1, $2) RETURNING id")
            .bind(collection)
            .bind(&fields)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DocumentError::Backend(e.to_string()))?;

        let id: Uuid = row.try_get("id").map_err(|e| DocumentError::Backend(e.to_string()))?;
        Ok(id.to_string())
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Document>, DocumentError> {
        // `@>` gives the same shallow-equality semantics the in-memory store
        // implements, for the flat objects the repositories persist.
        let filter = filter.unwrap_or_else(|| Value::Object(Default::default()));
        let rows = sqlx::query(
            "SELECT id, fields FROM documents WHERE collection = $1 AND fields @> $2 ORDER BY created_at",
        )
        .bind(collection)
        .bind(&filter)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DocumentError::Backend(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id").map_err(|e| DocumentError::Backend(e.to_string()))?;
                let fields: Value = row
                    .try_get("fields")
                    .map_err(|e| DocumentError::Backend(e.to_string()))?;
                Ok(Document {
                    id: id.to_string(),
                    fields,
                })
            })
            .collect()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DocumentError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DocumentError::Backend(e.to_string()))
    }
}
