//! Database schema migrations.
//!
//! Every collection lives in one `documents` table as JSON text. `seq` is
//! the storage-assigned key and defines storage order; it never appears in
//! a returned document. Expression indexes cover the business keys the
//! resolver looks up by.
//!
//! All statements are idempotent; `herbtrace init` can be run repeatedly.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        collection TEXT NOT NULL,
        body TEXT NOT NULL CHECK (json_valid(body))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq)",
    "CREATE INDEX IF NOT EXISTS idx_documents_package_id ON documents(collection, json_extract(body, '$.package_id'))",
    "CREATE INDEX IF NOT EXISTS idx_documents_batch_id ON documents(collection, json_extract(body, '$.batch_id'))",
    "CREATE INDEX IF NOT EXISTS idx_documents_herb_id ON documents(collection, json_extract(body, '$.herb_id'))",
];

/// Open the configured database and apply the schema.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = apply_schema(&pool).await;
    pool.close().await;
    result
}

/// Apply the schema to an already-open pool.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
