use super::{split_path, Document, DocumentStore, Fields, SetMode};
use crate::config::StoreConfig;
use crate::FinderError;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Document store reached over JSON/HTTP.
///
/// Documents live under `{base_url}/v1/{path}`. Field transforms are sent
/// as `{"$increment": n}`-style objects and resolved by the server.
pub struct HttpStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

impl HttpStore {
    /// Create a store from configuration
    pub fn new(config: &StoreConfig) -> Result<Self, FinderError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| FinderError::Store("store.base_url is not configured".to_string()))?;

        Ok(HttpStore {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path.trim_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FinderError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(FinderError::from_status(status))
        }
    }
}

fn wire_fields(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_wire()))
        .collect();
    json!({ "fields": map })
}

#[async_trait]
impl DocumentStore for HttpStore {
    fn store_name(&self) -> &str {
        "http"
    }

    async fn get(&self, path: &str) -> Result<Option<Document>, FinderError> {
        split_path(path)?;
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(FinderError::from_status(status)),
        }
    }

    async fn set(&self, path: &str, fields: Fields, mode: SetMode) -> Result<(), FinderError> {
        split_path(path)?;
        debug!("PATCH {} ({})", path, mode.as_str());
        let request = self
            .client
            .patch(self.url(path))
            .query(&[("mode", mode.as_str())])
            .json(&wire_fields(&fields));
        self.send(request).await?;
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, FinderError> {
        debug!("POST {}", collection);
        let request = self
            .client
            .post(self.url(collection))
            .json(&wire_fields(&fields));
        let created: AddResponse = self.send(request).await?.json().await?;
        Ok(created.id)
    }

    async fn delete(&self, path: &str) -> Result<(), FinderError> {
        split_path(path)?;
        let response = self
            .authorized(self.client.delete(self.url(path)))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(FinderError::from_status(status)),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, FinderError> {
        let listed: ListResponse = self
            .send(self.client.get(self.url(collection)))
            .await?
            .json()
            .await?;
        Ok(listed.documents)
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FinderError> {
        let equals = value.to_string();
        let request = self
            .client
            .get(self.url(collection))
            .query(&[("where", field), ("equals", equals.as_str())]);
        let listed: ListResponse = self.send(request).await?.json().await?;
        Ok(listed.documents)
    }
}
