//! Provenance resolution: package → retailer → farm batch → herb → processing.
//!
//! The collections are related only by business keys, so the join is done
//! here as a fixed sequence of lookups against a [`DocumentStore`]:
//!
//! ```text
//! packaging ──package_id──▶ retailers
//!     │
//!     └─ ingredients[].batch_id ──▶ farm_batches ──herb_id──▶ herbs
//!                               └─▶ processing (0..n per batch)
//! ```
//!
//! Farm batches, herbs and processing records are each fetched with a single
//! multi-key query rather than one query per ingredient. Missing related
//! records are not errors; they come back as empty objects (or `null` for the
//! retailer, `[]` for processing).
//!
//! Tie-breaks when a key matches several documents: the retailer and the farm
//! batch are the first match in storage order. Processing records keep
//! storage order.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::label;
use crate::models::{
    Collection, Document, IngredientProvenance, IngredientRef, ProvenanceResult, BATCH_ID, FORM,
    HERB_ID, INGREDIENTS, OUTPUT_FORM, PACKAGE_ID, PACKAGING_TYPE,
};
use crate::store::{DocumentStore, Filter};

/// Resolve the full provenance tree for a package.
///
/// Returns `Ok(None)` when no package has the given `package_id`. Store
/// failures and malformed package documents are returned as errors.
pub async fn resolve(
    store: &dyn DocumentStore,
    package_id: &str,
) -> Result<Option<ProvenanceResult>> {
    let by_package = Filter::eq(PACKAGE_ID, package_id);

    let mut package = match store
        .find_one(Collection::Packaging, &by_package)
        .await
        .with_context(|| format!("failed to load package {}", package_id))?
    {
        Some(p) => p,
        None => return Ok(None),
    };

    let retailer = store
        .find_one(Collection::Retailers, &by_package)
        .await
        .with_context(|| format!("failed to load retailer for package {}", package_id))?;

    let ingredients = ingredient_refs(&package)
        .with_context(|| format!("package {} has malformed ingredients", package_id))?;

    let batch_filter = Filter::any_of(BATCH_ID, ingredients.iter().map(|i| i.batch_id.as_str()));

    let farms = first_by_key(
        fetch(store, Collection::FarmBatches, &batch_filter).await?,
        BATCH_ID,
    );

    let herb_filter = Filter::any_of(HERB_ID, farms.values().filter_map(herb_id));
    let herbs = first_by_key(fetch(store, Collection::Herbs, &herb_filter).await?, HERB_ID);

    let mut processing: HashMap<String, Vec<Document>> = HashMap::new();
    for mut record in fetch(store, Collection::Processing, &batch_filter).await? {
        label::normalize_field(&mut record, OUTPUT_FORM);
        if let Some(key) = string_key(&record, BATCH_ID) {
            processing.entry(key.to_string()).or_default().push(record);
        }
    }

    let resolved: Vec<IngredientProvenance> = ingredients
        .into_iter()
        .map(|ing| {
            let farm_details = farms.get(&ing.batch_id).cloned().unwrap_or_default();
            let herb_details = herb_id(&farm_details)
                .and_then(|id| herbs.get(id).cloned())
                .unwrap_or_default();
            let processing_details = processing.get(&ing.batch_id).cloned().unwrap_or_default();
            IngredientProvenance {
                form: label::normalize(ing.form.as_ref()),
                batch_id: ing.batch_id,
                farm_details,
                herb_details,
                processing_details,
            }
        })
        .collect();

    normalize_package(&mut package);

    tracing::debug!(
        package_id,
        ingredients = resolved.len(),
        retailer = retailer.is_some(),
        "resolved package provenance"
    );

    Ok(Some(ProvenanceResult {
        package_details: package,
        retailer_details: retailer,
        ingredients: resolved,
    }))
}

/// Parse the package's `ingredients` list. A missing or `null` list is empty.
fn ingredient_refs(package: &Document) -> Result<Vec<IngredientRef>> {
    match package.get(INGREDIENTS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => Ok(serde_json::from_value(list.clone())?),
    }
}

/// Run a multi-record query, skipping the round-trip for an empty key set.
async fn fetch(
    store: &dyn DocumentStore,
    collection: Collection,
    filter: &Filter,
) -> Result<Vec<Document>> {
    if filter.is_empty() {
        return Ok(Vec::new());
    }
    store
        .find_many(collection, filter)
        .await
        .with_context(|| format!("failed to query {}", collection))
}

/// Index documents by a string key; the first document per key wins.
fn first_by_key(docs: Vec<Document>, key: &str) -> HashMap<String, Document> {
    let mut index = HashMap::new();
    for doc in docs {
        if let Some(k) = string_key(&doc, key) {
            index.entry(k.to_string()).or_insert(doc);
        }
    }
    index
}

fn string_key<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// The farm record's herb reference, if it has a non-empty one.
fn herb_id(farm: &Document) -> Option<&str> {
    string_key(farm, HERB_ID).filter(|id| !id.is_empty())
}

/// Normalize the label fields carried on the package document itself.
fn normalize_package(package: &mut Document) {
    label::normalize_field(package, PACKAGING_TYPE);
    if let Some(Value::Array(entries)) = package.get_mut(INGREDIENTS) {
        for entry in entries.iter_mut() {
            if let Value::Object(entry) = entry {
                label::normalize_field(entry, FORM);
            }
        }
    }
}
