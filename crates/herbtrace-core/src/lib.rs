//! # HerbTrace Core
//!
//! Runtime-free logic for HerbTrace: data models, bilingual label
//! normalization, the document store abstraction, and the provenance
//! resolver that joins packages back to farms and herbs.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Storage backends live behind the
//! [`store::DocumentStore`] trait.

pub mod label;
pub mod models;
pub mod provenance;
pub mod store;

pub use label::{BilingualLabel, LabelField};
pub use models::{Collection, Document, IngredientProvenance, ProvenanceResult};
pub use provenance::resolve;
pub use store::{DocumentStore, Filter};
