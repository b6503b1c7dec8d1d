mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::FinderError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Field writes for one document
pub type Fields = BTreeMap<String, FieldValue>;

/// A stored document: its id (last path segment) and its fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Numeric field, 0 when missing
    pub fn count(&self, name: &str) -> u64 {
        self.fields
            .get(name)
            .and_then(Value::as_i64)
            .map(|n| n.max(0) as u64)
            .unwrap_or(0)
    }

    /// Server timestamp, stored as `{"seconds": n}` or a bare number of seconds
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let seconds = match self.fields.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::Object(map) => map.get("seconds").and_then(Value::as_i64),
            _ => None,
        }?;
        DateTime::from_timestamp(seconds, 0)
    }

    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A value written to a field, possibly resolved by the store
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    /// Replaced with the store's clock at write time
    ServerTimestamp,
    /// Atomic add to a numeric field (missing counts as 0)
    Increment(i64),
    /// Append unless already present
    ArrayUnion(Value),
    /// Remove every equal element
    ArrayRemove(Value),
}

impl FieldValue {
    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::Value(Value::String(value.into()))
    }

    /// JSON form sent to a remote store
    pub fn to_wire(&self) -> Value {
        match self {
            FieldValue::Value(v) => v.clone(),
            FieldValue::ServerTimestamp => json!({ "$serverTimestamp": true }),
            FieldValue::Increment(n) => json!({ "$increment": n }),
            FieldValue::ArrayUnion(v) => json!({ "$arrayUnion": v }),
            FieldValue::ArrayRemove(v) => json!({ "$arrayRemove": v }),
        }
    }
}

/// Build a field map from literal entries
pub fn fields<const N: usize>(entries: [(&str, FieldValue); N]) -> Fields {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Drop fields that are not written
    Replace,
    /// Keep fields that are not written
    Merge,
}

impl SetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetMode::Replace => "replace",
            SetMode::Merge => "merge",
        }
    }
}

/// Capabilities of the hosted document database.
///
/// Paths alternate collection and document segments:
/// `users/{uid}/savedRecipes/{recipeId}`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get the store name (e.g., "memory", "http")
    fn store_name(&self) -> &str;

    async fn get(&self, path: &str) -> Result<Option<Document>, FinderError>;

    async fn set(&self, path: &str, fields: Fields, mode: SetMode) -> Result<(), FinderError>;

    /// Insert a document with a store-generated id and return the id
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, FinderError>;

    /// Deleting a missing document is not an error
    async fn delete(&self, path: &str) -> Result<(), FinderError>;

    /// Every document directly inside `collection`
    async fn list(&self, collection: &str) -> Result<Vec<Document>, FinderError>;

    /// Documents in `collection` whose `field` equals `value`
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FinderError>;
}

/// Split a document path into its collection and id
pub(crate) fn split_path(path: &str) -> Result<(&str, &str), FinderError> {
    match path.trim_matches('/').rsplit_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() => Ok((collection, id)),
        _ => Err(FinderError::Store(format!("not a document path: '{}'", path))),
    }
}
