//! Document store implementation using PostgreSQL.
//!
//! Each collection is a table holding the document body as JSONB:
//! `(_id TEXT PRIMARY KEY, doc JSONB NOT NULL, created_at TIMESTAMPTZ)`.

use crate::domain::DocumentFilter;
use crate::storage::store::{validate_collection_name, Document, DocumentStore, StoreError};
use crate::storage::ObjectId;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// A document store backed by a PostgreSQL connection pool.
pub struct PostgresDocumentStore {
    pool: PgPool,
    /// Collections whose table is known to exist.
    ensured: RwLock<HashSet<String>>,
    /// Serializes `CREATE TABLE` so concurrent first writes do not race in the catalog.
    create_lock: Mutex<()>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ensured: RwLock::new(HashSet::new()),
            create_lock: Mutex::new(()),
        }
    }

    /// Builds a lazily connecting pool for `database_url`; `database_name` replaces the
    /// database named in the URL.
    ///
    /// Only a malformed URL fails here. An unreachable server surfaces per request, and
    /// requests succeed again once the server is back.
    pub fn connect(
        database_url: &str,
        database_name: Option<&str>,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = PgConnectOptions::from_str(database_url)?;
        if let Some(name) = database_name {
            options = options.database(name);
        }
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);
        Ok(Self::new(pool))
    }

    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        if self.ensured.read().await.contains(collection) {
            return Ok(());
        }

        let _guard = self.create_lock.lock().await;
        // Another request may have created it while we waited.
        if self.ensured.read().await.contains(collection) {
            return Ok(());
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (
                _id TEXT PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            collection
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        self.ensured.write().await.insert(collection.to_string());
        Ok(())
    }
}

/// `SELECT` for up to `limit` documents of `collection` matching `filter`.
fn build_find_query<'a>(
    collection: &str,
    filter: &DocumentFilter,
    limit: usize,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT _id, doc FROM \"{}\"", collection));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY created_at, _id LIMIT ")
        .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    qb
}

/// Appends the WHERE clause for `filter` to `qb`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &DocumentFilter) {
    qb.push(" WHERE TRUE");
    for (field, value) in filter.equals() {
        // Compare as JSON so only string values can match.
        qb.push(" AND doc -> ")
            .push_bind(field.clone())
            .push(" = to_jsonb(")
            .push_bind(value.clone())
            .push("::text)");
    }
    if let Some(text) = filter.text_match() {
        qb.push(" AND (FALSE");
        for field in &text.fields {
            qb.push(" OR strpos(lower(CASE WHEN jsonb_typeof(doc -> ")
                .push_bind(field.clone())
                .push(") = 'string' THEN doc ->> ")
                .push_bind(field.clone())
                .push(" END), lower(")
                .push_bind(text.needle.clone())
                .push(")) > 0");
            qb.push(" OR EXISTS (SELECT 1 FROM jsonb_array_elements(CASE WHEN jsonb_typeof(doc -> ")
                .push_bind(field.clone())
                .push(") = 'array' THEN doc -> ")
                .push_bind(field.clone())
                .push(" ELSE '[]'::jsonb END) AS e(v) WHERE jsonb_typeof(e.v) = 'string' AND strpos(lower(e.v #>> '{}'), lower(")
                .push_bind(text.needle.clone())
                .push(")) > 0)");
        }
        qb.push(")");
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_collection(collection).await?;

        let mut qb = build_find_query(collection, filter, limit);
        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("_id")?;
            let doc: JsonValue = row.try_get("doc")?;
            match doc {
                JsonValue::Object(body) => docs.push(Document { id, body }),
                other => {
                    return Err(StoreError::Corrupt {
                        collection: collection.to_string(),
                        id,
                        reason: format!("expected object, found {}", other),
                    })
                }
            }
        }
        Ok(docs)
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, JsonValue>,
    ) -> Result<ObjectId, StoreError> {
        self.ensure_collection(collection).await?;

        let id = ObjectId::new();
        let sql = format!("INSERT INTO \"{}\" (_id, doc) VALUES ($1, $2)", collection);
        sqlx::query(&sql)
            .bind(id.to_hex())
            .bind(JsonValue::Object(body))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT table_name::text AS table_name
             FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
             ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.try_get::<String, _>("table_name").ok())
            .collect())
    }

    async fn database_name(&self) -> Result<String, StoreError> {
        let name: String = sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_query_without_filter() {
        let qb = build_find_query("gift", &DocumentFilter::new(), 24);
        assert_eq!(
            qb.sql(),
            "SELECT _id, doc FROM \"gift\" WHERE TRUE ORDER BY created_at, _id LIMIT $1"
        );
    }

    #[test]
    fn find_query_with_exact_and_text_match() {
        let filter = DocumentFilter::new()
            .where_eq("gift", "mug")
            .where_eq("background", "blue")
            .text(Some("birth"), ["tags"]);
        let qb = build_find_query("gift", &filter, 10);
        assert_eq!(
            qb.sql(),
            "SELECT _id, doc FROM \"gift\" WHERE TRUE \
             AND doc -> $1 = to_jsonb($2::text) \
             AND doc -> $3 = to_jsonb($4::text) \
             AND (FALSE \
             OR strpos(lower(CASE WHEN jsonb_typeof(doc -> $5) = 'string' THEN doc ->> $6 END), lower($7)) > 0 \
             OR EXISTS (SELECT 1 FROM jsonb_array_elements(CASE WHEN jsonb_typeof(doc -> $8) = 'array' THEN doc -> $9 ELSE '[]'::jsonb END) AS e(v) \
             WHERE jsonb_typeof(e.v) = 'string' AND strpos(lower(e.v #>> '{}'), lower($10)) > 0)) \
             ORDER BY created_at, _id LIMIT $11"
        );
    }

    #[test]
    fn text_match_covers_every_field() {
        let filter = DocumentFilter::new().text(Some("x"), ["title", "description", "tags"]);
        let sql = build_find_query("gift", &filter, 1).sql().to_string();
        assert_eq!(sql.matches(" OR strpos(").count(), 3);
        assert_eq!(sql.matches(" OR EXISTS (").count(), 3);
        assert!(sql.ends_with(") ORDER BY created_at, _id LIMIT $16"));
    }

    #[tokio::test]
    async fn connect_is_lazy_and_rejects_malformed_urls() {
        let store = PostgresDocumentStore::connect(
            "postgres://127.0.0.1:1/unreachable",
            Some("other"),
            1,
            Duration::from_millis(200),
        );
        assert!(store.is_ok());

        let err = PostgresDocumentStore::connect("not a url", None, 1, Duration::from_millis(200));
        assert!(matches!(err, Err(StoreError::Database(_))));
    }
}
