//! Context block assembled from optional raw fields

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::input::{non_blank, AdditionalFields};

/// A `{key, value}` hint; the value is passed through as given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTerm {
    pub source: String,
    pub target: String,
}

/// Domain hints that bias recognition and translation.
///
/// Never serialized empty: [`ContextBlock::from_fields`] returns `None`
/// when no sub-field carries a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextBlock {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub general: Vec<ContextEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub translation_terms: Vec<TranslationTerm>,
}

impl ContextBlock {
    pub fn from_fields(fields: &AdditionalFields) -> Option<Self> {
        let block = Self {
            general: parse_json_list("contextGeneral", fields.context_general.as_deref()),
            text: non_blank(fields.context_text.as_deref()).map(str::to_string),
            terms: split_list(fields.context_terms.as_deref()),
            translation_terms: parse_json_list(
                "contextTranslationTerms",
                fields.context_translation_terms.as_deref(),
            ),
        };

        (!block.is_empty()).then_some(block)
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty()
            && self.text.is_none()
            && self.terms.is_empty()
            && self.translation_terms.is_empty()
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a JSON array field. Invalid JSON is skipped with a warning.
fn parse_json_list<T: DeserializeOwned>(field: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = non_blank(raw) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(list) => list,
        Err(e) => {
            warn!(field, error = %e, "Ignoring invalid JSON in context field");
            Vec::new()
        }
    }
}
