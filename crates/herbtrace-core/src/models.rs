//! Core data types shared by the resolver and the storage backends.
//!
//! Stored entities are schemaless JSON objects ([`Document`]); only the
//! business keys the resolver joins on are given names here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::label::BilingualLabel;

/// A stored record: a JSON object with no storage-assigned identifier.
pub type Document = Map<String, Value>;

pub const PACKAGE_ID: &str = "package_id";
pub const BATCH_ID: &str = "batch_id";
pub const HERB_ID: &str = "herb_id";
pub const INGREDIENTS: &str = "ingredients";
pub const PACKAGING_TYPE: &str = "packaging_type";
pub const FORM: &str = "form";
pub const OUTPUT_FORM: &str = "output_form";

/// The document collections the resolver reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Packaging,
    Retailers,
    FarmBatches,
    Herbs,
    Processing,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Packaging,
        Collection::Retailers,
        Collection::FarmBatches,
        Collection::Herbs,
        Collection::Processing,
    ];

    /// Collection name as stored.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Packaging => "packaging",
            Collection::Retailers => "retailers",
            Collection::FarmBatches => "farm_batches",
            Collection::Herbs => "herbs",
            Collection::Processing => "processing",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a package's `ingredients` list.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRef {
    pub batch_id: String,
    #[serde(default)]
    pub form: Option<Value>,
}

/// Full provenance tree for a package, as returned by `GET /get_package/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceResult {
    pub package_details: Document,
    pub retailer_details: Option<Document>,
    pub ingredients: Vec<IngredientProvenance>,
}

/// Provenance of a single ingredient: its farm batch, herb, and processing steps.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientProvenance {
    pub batch_id: String,
    pub form: BilingualLabel,
    pub farm_details: Document,
    pub herb_details: Document,
    pub processing_details: Vec<Document>,
}
