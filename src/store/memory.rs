use super::{split_path, Document, DocumentStore, FieldValue, Fields, SetMode};
use crate::FinderError;
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<String, Map<String, Value>>,
    next_id: u64,
    /// Fixed clock for server timestamps; system time when unset
    now: Option<i64>,
}

/// Process-local document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Pin the clock used for server timestamps
    pub async fn set_time(&self, seconds: i64) {
        self.state.write().await.now = Some(seconds);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl State {
    fn now(&self) -> i64 {
        self.now.unwrap_or_else(|| Utc::now().timestamp())
    }

    fn apply(&mut self, path: &str, fields: Fields, mode: SetMode) {
        let now = self.now();
        let mut doc = match mode {
            SetMode::Merge => self.documents.remove(path).unwrap_or_default(),
            SetMode::Replace => Map::new(),
        };
        for (name, value) in fields {
            let current = doc.remove(&name);
            doc.insert(name, resolve(current, value, now));
        }
        self.documents.insert(path.to_string(), doc);
    }
}

fn resolve(current: Option<Value>, value: FieldValue, now: i64) -> Value {
    match value {
        FieldValue::Value(v) => v,
        FieldValue::ServerTimestamp => json!({ "seconds": now }),
        FieldValue::Increment(by) => {
            let base = current.as_ref().and_then(Value::as_i64).unwrap_or(0);
            json!(base + by)
        }
        FieldValue::ArrayUnion(item) => {
            let mut items = into_array(current);
            if !items.contains(&item) {
                items.push(item);
            }
            Value::Array(items)
        }
        FieldValue::ArrayRemove(item) => {
            let mut items = into_array(current);
            items.retain(|v| v != &item);
            Value::Array(items)
        }
    }
}

fn into_array(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn in_collection(path: &str, collection: &str) -> bool {
    matches!(split_path(path), Ok((parent, _)) if parent == collection.trim_matches('/'))
}

fn to_document(path: &str, fields: &Map<String, Value>) -> Document {
    let path = path.trim_matches('/');
    let id = path.rsplit('/').next().unwrap_or(path).to_string();
    Document {
        id,
        fields: fields.clone(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, path: &str) -> Result<Option<Document>, FinderError> {
        split_path(path)?;
        let state = self.state.read().await;
        Ok(state
            .documents
            .get(path.trim_matches('/'))
            .map(|fields| to_document(path, fields)))
    }

    async fn set(&self, path: &str, fields: Fields, mode: SetMode) -> Result<(), FinderError> {
        split_path(path)?;
        debug!("set {} ({})", path, mode.as_str());
        self.state
            .write()
            .await
            .apply(path.trim_matches('/'), fields, mode);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, FinderError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = format!("doc{:06}", state.next_id);
        let path = format!("{}/{}", collection.trim_matches('/'), id);
        split_path(&path)?;
        state.apply(&path, fields, SetMode::Replace);
        Ok(id)
    }

    async fn delete(&self, path: &str) -> Result<(), FinderError> {
        split_path(path)?;
        self.state
            .write()
            .await
            .documents
            .remove(path.trim_matches('/'));
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, FinderError> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|(path, _)| in_collection(path, collection))
            .map(|(path, fields)| to_document(path, fields))
            .collect())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FinderError> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .filter(|doc| doc.fields.get(field) == Some(value))
            .collect())
    }
}
