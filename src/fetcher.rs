use crate::FinderError;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; RecipeFinder/1.0)";

/// Thin HTTP client for JSON documents
#[derive(Debug, Clone)]
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FinderError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Non-success statuses are reported as [`FinderError::Http`].
    pub async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, FinderError> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FinderError::from_status(status));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
