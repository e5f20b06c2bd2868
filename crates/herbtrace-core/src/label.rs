//! Bilingual label normalization.
//!
//! Several fields (`packaging_type`, ingredient `form`, processing
//! `output_form`) carry a label in English and Sanskrit. Older records store
//! a bare string instead. Both shapes are read into a [`LabelField`] and
//! resolved into the canonical [`BilingualLabel`] before they leave the
//! resolver.
//!
//! | Stored value | Canonical label |
//! |--------------|-----------------|
//! | `{"english": "Jar", "sanskrit": "Kupi"}` | unchanged |
//! | `"Glass Jar"` | `{"english": "Glass Jar", "sanskrit": "-"}` |
//! | `5`, `true`, `[..]` | JSON text in `english`, `"-"` in `sanskrit` |
//! | missing or `null` | `{"english": "-", "sanskrit": "-"}` |

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::Document;

/// Placeholder used for any side of a label that has no value.
pub const PLACEHOLDER: &str = "-";

/// Canonical two-language label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualLabel {
    pub english: String,
    pub sanskrit: String,
}

impl BilingualLabel {
    pub fn new(english: impl Into<String>, sanskrit: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            sanskrit: sanskrit.into(),
        }
    }

    /// A label with only the English side known.
    pub fn english_only(english: impl Into<String>) -> Self {
        Self::new(english, PLACEHOLDER)
    }
}

impl From<BilingualLabel> for Value {
    fn from(label: BilingualLabel) -> Self {
        json!({ "english": label.english, "sanskrit": label.sanskrit })
    }
}

/// The two stored shapes of a label field.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelField {
    /// Object shape. Missing sides are already filled with [`PLACEHOLDER`].
    Bilingual(BilingualLabel),
    /// Anything that is not an object: a bare string, number, null, ...
    Legacy(Value),
}

impl LabelField {
    /// Classify a stored value. `None` (field absent) is treated as `null`.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => LabelField::Bilingual(BilingualLabel {
                english: stringify(map.get("english")),
                sanskrit: stringify(map.get("sanskrit")),
            }),
            Some(other) => LabelField::Legacy(other.clone()),
            None => LabelField::Legacy(Value::Null),
        }
    }

    pub fn into_canonical(self) -> BilingualLabel {
        match self {
            LabelField::Bilingual(label) => label,
            LabelField::Legacy(value) => BilingualLabel::english_only(stringify(Some(&value))),
        }
    }
}

/// Normalize a stored label value into its canonical form.
pub fn normalize(value: Option<&Value>) -> BilingualLabel {
    LabelField::from_value(value).into_canonical()
}

/// Rewrite `doc[key]` in place as a canonical label object.
///
/// The key is inserted even if it was absent.
pub fn normalize_field(doc: &mut Document, key: &str) {
    let label = normalize(doc.get(key));
    doc.insert(key.to_string(), label.into());
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_is_lifted() {
        let label = normalize(Some(&json!("Glass Jar")));
        assert_eq!(label, BilingualLabel::new("Glass Jar", "-"));
    }

    #[test]
    fn test_bilingual_passes_through() {
        let label = normalize(Some(&json!({"english": "Jar", "sanskrit": "Kupi"})));
        assert_eq!(label, BilingualLabel::new("Jar", "Kupi"));
    }

    #[test]
    fn test_missing_and_null() {
        assert_eq!(normalize(None), BilingualLabel::new("-", "-"));
        assert_eq!(normalize(Some(&Value::Null)), BilingualLabel::new("-", "-"));
    }

    #[test]
    fn test_non_string_scalars_use_json_text() {
        assert_eq!(normalize(Some(&json!(5))).english, "5");
        assert_eq!(normalize(Some(&json!(2.5))).english, "2.5");
        assert_eq!(normalize(Some(&json!(true))).english, "true");
        assert_eq!(normalize(Some(&json!(["a", "b"]))).english, r#"["a","b"]"#);
    }

    #[test]
    fn test_partial_object_fills_placeholder() {
        let label = normalize(Some(&json!({"english": "Powder", "note": "x"})));
        assert_eq!(label, BilingualLabel::new("Powder", "-"));

        let label = normalize(Some(&json!({"sanskrit": "Churna"})));
        assert_eq!(label, BilingualLabel::new("-", "Churna"));
    }

    #[test]
    fn test_classification() {
        assert!(matches!(
            LabelField::from_value(Some(&json!({"english": "a", "sanskrit": "b"}))),
            LabelField::Bilingual(_)
        ));
        assert_eq!(
            LabelField::from_value(Some(&json!("Tablet"))),
            LabelField::Legacy(json!("Tablet"))
        );
    }

    #[test]
    fn test_normalize_field_in_place() {
        let mut doc = Document::new();
        doc.insert("packaging_type".into(), json!("Glass Jar"));
        normalize_field(&mut doc, "packaging_type");
        assert_eq!(
            doc["packaging_type"],
            json!({"english": "Glass Jar", "sanskrit": "-"})
        );

        normalize_field(&mut doc, "absent");
        assert_eq!(doc["absent"], json!({"english": "-", "sanskrit": "-"}));
    }
}
