//! Storage abstraction for HerbTrace.
//!
//! The [`DocumentStore`] trait is the only thing the resolver knows about
//! storage: a keyed lookup and a filtered multi-record scan over named
//! collections. Backends (SQLite, in-memory) implement it.
//!
//! Implementations must be `Send + Sync` so one handle can be shared by
//! every request the HTTP server is handling.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Collection, Document};

/// Field holding a storage-assigned identifier in imported records.
///
/// Stores remove it before returning a document.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Match condition on a single string-valued business key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `field == value`
    Eq { field: String, value: String },
    /// `field` equals any of `values`. An empty set matches nothing.
    AnyOf { field: String, values: Vec<String> },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build an `AnyOf` filter. Duplicate values are dropped, first
    /// occurrence order kept.
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for v in values {
            let v = v.into();
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        Filter::AnyOf {
            field: field.into(),
            values: unique,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::Eq { field, .. } | Filter::AnyOf { field, .. } => field,
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            Filter::Eq { value, .. } => std::slice::from_ref(value),
            Filter::AnyOf { values, .. } => values,
        }
    }

    /// True when the filter cannot match any document.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Evaluate the filter against a document. Only string fields match.
    pub fn matches(&self, doc: &Document) -> bool {
        match doc.get(self.field()) {
            Some(Value::String(s)) => self.values().iter().any(|v| v == s),
            _ => false,
        }
    }
}

/// Remove [`INTERNAL_ID_FIELD`] from a document.
pub fn strip_internal_id(mut doc: Document) -> Document {
    doc.remove(INTERNAL_ID_FIELD);
    doc
}

/// Abstract document store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_one`](DocumentStore::find_one) | First matching document in storage order |
/// | [`find_many`](DocumentStore::find_many) | All matching documents in storage order |
///
/// Returned documents never contain [`INTERNAL_ID_FIELD`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>>;

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>>;
}
