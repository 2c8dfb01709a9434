//! Mapping engine hits to public product records.
//!
//! A hit missing a field, or carrying a value of the wrong type, still maps:
//! the field falls back to `""` or `0` and the defect is logged. Order and
//! cardinality are never changed here.

use crate::fields::{FieldKind, ProductField};
use crate::models::ProductRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Scalar stored-field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    /// Convert a JSON value; non-scalars and `null` yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn as_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::String(s) => s.trim().parse().ok(),
            Self::Float(_) | Self::Bool(_) => None,
        }
    }
}

/// Stored fields of a single hit, as returned by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedDocument {
    pub fields: BTreeMap<String, FieldValue>,
}

impl MatchedDocument {
    /// Build from a hit's `_source`. Anything but an object yields an empty document.
    pub fn from_source(source: &Value) -> Self {
        let fields = source
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
                    .collect()
            })
            .unwrap_or_default();
        Self { fields }
    }

    pub fn get(&self, field: ProductField) -> Option<&FieldValue> {
        self.fields.get(field.name())
    }
}

impl FromIterator<(String, FieldValue)> for MatchedDocument {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Map hits to records, one-to-one and in order.
pub fn map_documents(documents: &[MatchedDocument]) -> Vec<ProductRecord> {
    documents.iter().map(ProductRecord::from_document).collect()
}

impl ProductRecord {
    pub fn from_document(document: &MatchedDocument) -> Self {
        Self {
            title: text_field(document, ProductField::Title),
            brand: text_field(document, ProductField::Brand),
            price: integer_field(document, ProductField::Price),
            stock: integer_field(document, ProductField::Stock),
        }
    }
}

fn text_field(document: &MatchedDocument, field: ProductField) -> String {
    debug_assert_eq!(field.kind(), FieldKind::Text);
    match document.get(field) {
        Some(value) => value.as_text(),
        None => {
            tracing::debug!(field = %field, "PartialDocumentDefect: missing text field, using empty string");
            String::new()
        }
    }
}

fn integer_field(document: &MatchedDocument, field: ProductField) -> i64 {
    debug_assert_eq!(field.kind(), FieldKind::Integer);
    match document.get(field).map(|v| (v, v.as_integer())) {
        Some((_, Some(n))) => n,
        Some((value, None)) => {
            tracing::debug!(field = %field, value = ?value, "PartialDocumentDefect: non-integer value, using 0");
            0
        }
        None => {
            tracing::debug!(field = %field, "PartialDocumentDefect: missing integer field, using 0");
            0
        }
    }
}
