//! SQLite-backed [`DocumentStore`] implementation.
//!
//! Documents are JSON text in the `documents` table (see [`crate::migrate`]).
//! Filters compile to `json_extract(body, '$.<field>')` comparisons so they
//! hit the business-key expression indexes. Rows come back ordered by `seq`,
//! which is insertion order.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use herbtrace_core::models::{Collection, Document};
use herbtrace_core::store::{strip_internal_id, DocumentStore, Filter};

/// SQLite implementation of the [`DocumentStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the underlying pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Document>> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }

        let path = json_path(filter.field())?;
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT body FROM documents WHERE collection = ");
        qb.push_bind(collection.name());
        qb.push(format!(" AND json_extract(body, '{}') IN (", path));
        let mut values = qb.separated(", ");
        for v in filter.values() {
            values.push_bind(v.clone());
        }
        values.push_unseparated(")");
        qb.push(" ORDER BY seq ASC");
        if let Some(n) = limit {
            qb.push(" LIMIT ");
            qb.push_bind(n);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                let body: String = row.try_get("body")?;
                parse_document(collection, &body)
            })
            .collect()
    }
}

/// JSON path for a top-level field. Field names are spliced into SQL, so
/// only ASCII identifiers are accepted.
fn json_path(field: &str) -> Result<String> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("invalid filter field name: '{}'", field);
    }
    Ok(format!("$.{}", field))
}

fn parse_document(collection: Collection, body: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(body)
        .with_context(|| format!("corrupt document in {}", collection))?;
    match value {
        Value::Object(doc) => Ok(strip_internal_id(doc)),
        _ => bail!("document in {} is not a JSON object", collection),
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.query(collection, filter, Some(1)).await?.into_iter().next())
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        self.query(collection, filter, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_path() {
        assert_eq!(json_path("batch_id").unwrap(), "$.batch_id");
        assert!(json_path("").is_err());
        assert!(json_path("a') OR 1=1 --").is_err());
        assert!(json_path("nested.field").is_err());
    }

    #[test]
    fn test_parse_document_strips_id() {
        let doc = parse_document(Collection::Herbs, r#"{"_id": "x", "herb_id": "H1"}"#).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc["herb_id"], "H1");
    }

    #[test]
    fn test_parse_document_rejects_non_object() {
        let err = parse_document(Collection::Herbs, "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("herbs"));
    }
}
