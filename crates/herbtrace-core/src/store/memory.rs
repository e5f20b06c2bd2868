//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Each collection is a `Vec` behind a `std::sync::RwLock`, so storage order
//! is insertion order. Lookups are linear scans.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Collection, Document};

use super::{strip_internal_id, DocumentStore, Filter};

/// In-memory document store.
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Append a document to a collection. The value must be a JSON object.
    pub fn insert(&self, collection: Collection, doc: Value) -> Result<()> {
        let Value::Object(doc) = doc else {
            bail!("{} documents must be JSON objects", collection);
        };
        let mut collections = self
            .collections
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        collections.entry(collection).or_default().push(doc);
        Ok(())
    }

    /// Number of documents stored in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .map(|c| c.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn scan(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let docs = match collections.get(&collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        Ok(docs
            .iter()
            .filter(|d| filter.matches(d))
            .take(limit.unwrap_or(usize::MAX))
            .map(|d| strip_internal_id(d.clone()))
            .collect())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.scan(collection, filter, Some(1))?.into_iter().next())
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        self.scan(collection, filter, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_one_first_in_insertion_order() {
        let store = InMemoryStore::new();
        store
            .insert(Collection::Retailers, json!({"package_id": "P1", "name": "first"}))
            .unwrap();
        store
            .insert(Collection::Retailers, json!({"package_id": "P1", "name": "second"}))
            .unwrap();

        let found = store
            .find_one(Collection::Retailers, &Filter::eq("package_id", "P1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "first");
    }

    #[tokio::test]
    async fn test_find_many_any_of_keeps_storage_order() {
        let store = InMemoryStore::new();
        for (batch, step) in [("B1", "wash"), ("B2", "dry"), ("B1", "grind"), ("B3", "pack")] {
            store
                .insert(Collection::Processing, json!({"batch_id": batch, "step": step}))
                .unwrap();
        }

        let found = store
            .find_many(Collection::Processing, &Filter::any_of("batch_id", ["B1", "B2"]))
            .await
            .unwrap();
        let steps: Vec<&str> = found.iter().map(|d| d["step"].as_str().unwrap()).collect();
        assert_eq!(steps, vec!["wash", "dry", "grind"]);
    }

    #[tokio::test]
    async fn test_internal_id_stripped() {
        let store = InMemoryStore::new();
        store
            .insert(Collection::Herbs, json!({"_id": "65af", "herb_id": "H1"}))
            .unwrap();
        let found = store
            .find_one(Collection::Herbs, &Filter::eq("herb_id", "H1"))
            .await
            .unwrap()
            .unwrap();
        assert!(!found.contains_key("_id"));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = InMemoryStore::new();
        store
            .insert(Collection::Herbs, json!({"batch_id": "B1"}))
            .unwrap();
        let found = store
            .find_many(Collection::Processing, &Filter::eq("batch_id", "B1"))
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(store.count(Collection::Herbs), 1);
        assert_eq!(store.count(Collection::Processing), 0);
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let store = InMemoryStore::new();
        assert!(store.insert(Collection::Herbs, json!("not an object")).is_err());
    }
}
