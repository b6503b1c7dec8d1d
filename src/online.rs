use crate::config::ApiConfig;
use crate::dataset::recipes_from_value;
use crate::fetcher::RequestFetcher;
use crate::model::Recipe;
use crate::FinderError;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Client for the hosted recipe API behind "smart search"
#[derive(Debug, Clone)]
pub struct OnlineSearch {
    fetcher: RequestFetcher,
    base_url: String,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl OnlineSearch {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, FinderError> {
        Ok(OnlineSearch {
            fetcher: RequestFetcher::new(Some(Duration::from_secs(config.timeout_secs)))?,
            base_url: config.resolved_base_url(),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: impl Into<String>) -> Result<Self, FinderError> {
        let config = ApiConfig {
            base_url: Some(base_url.into()),
            retry_attempts: 1,
            retry_delay_ms: 0,
            ..Default::default()
        };
        OnlineSearch::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL the API is queried at, e.g. `https://host/?q=tomato+onion`
    pub fn request_url(&self, tokens: &[String]) -> Result<reqwest::Url, FinderError> {
        let base = format!("{}/", self.base_url);
        reqwest::Url::parse_with_params(&base, &[("q", tokens.join(" "))])
            .map_err(|e| FinderError::Api(format!("invalid API URL '{}': {}", base, e)))
    }

    /// Query the API with the cleaned tokens, retrying with growing delays
    pub async fn search(&self, tokens: &[String]) -> Result<Vec<Recipe>, FinderError> {
        let query = tokens.join(" ");
        let url = self.request_url(tokens)?;
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!(
                "API request for '{}' (attempt {}/{})",
                query, attempt, self.retry_attempts
            );

            match self.fetcher.fetch_json(url.as_str(), &[]).await {
                Ok(document) => {
                    let recipes = recipes_from_value(document);
                    info!("API returned {} recipes for '{}'", recipes.len(), query);
                    return Ok(recipes);
                }
                Err(e) => {
                    warn!(
                        "API request failed (attempt {}/{}): {}",
                        attempt, self.retry_attempts, e
                    );
                    last_error = Some(e.to_string());
                }
            }

            if attempt < self.retry_attempts {
                let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(FinderError::Api(
            last_error.unwrap_or_else(|| "no attempts made".to_string()),
        ))
    }
}

/// Reject input the online API cannot do anything with
pub fn validate_online_input(input: &str) -> Result<&str, FinderError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FinderError::Validation(
            "Please enter ingredients first!".to_string(),
        ));
    }
    if trimmed.chars().count() < 2 {
        return Err(FinderError::Validation(
            "Please enter at least 2 characters".to_string(),
        ));
    }
    Ok(trimmed)
}
