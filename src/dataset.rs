use crate::fetcher::RequestFetcher;
use crate::matcher::filter_recipes;
use crate::model::Recipe;
use crate::parser::parse_ingredients;
use crate::FinderError;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Message shown when the session dataset could not be loaded
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load recipes. Please refresh the page.";

/// Default soft timeout for loading the dataset
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Extra time the HTTP client gets so the soft timeout always fires first
const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Where the recipe dataset is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Interpret a config value: `http://` and `https://` are URLs, anything else a path
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetSource::Url(trimmed.to_string())
        } else {
            DatasetSource::File(PathBuf::from(trimmed))
        }
    }
}

/// The recipe list for one session.
///
/// Loaded once, never mutated afterwards. Searches borrow from it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    recipes: Vec<Recipe>,
}

impl Dataset {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let dataset = Dataset { recipes };
        for (id, names) in dataset.id_collisions() {
            warn!("Recipes {:?} share the identity '{}'", names, id);
        }
        dataset
    }

    pub fn empty() -> Self {
        Dataset::default()
    }

    /// Load the dataset, failing if the source cannot be read in time
    pub async fn load(source: &DatasetSource, timeout: Duration) -> Result<Self, FinderError> {
        let document = tokio::time::timeout(timeout, read_document(source, timeout))
            .await
            .map_err(|_| FinderError::Timeout(timeout))??;

        let dataset = Dataset::new(recipes_from_value(document));
        info!("Loaded {} recipes", dataset.len());
        Ok(dataset)
    }

    /// Load the dataset, degrading to an empty one on failure.
    ///
    /// The error is returned alongside so the caller can tell the user.
    pub async fn load_or_empty(
        source: &DatasetSource,
        timeout: Duration,
    ) -> (Self, Option<FinderError>) {
        match Dataset::load(source, timeout).await {
            Ok(dataset) => (dataset, None),
            Err(e) => {
                error!("Failed to load recipes from {:?}: {}", source, e);
                (Dataset::empty(), Some(e))
            }
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipes matching the free-text ingredient query, in dataset order
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        filter_recipes(&self.recipes, &parse_ingredients(query))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id() == id)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.recipes.iter().position(|r| r.name == name)
    }

    /// Identities shared by more than one recipe, with the clashing names
    pub fn id_collisions(&self) -> Vec<(String, Vec<String>)> {
        let mut by_id: HashMap<String, Vec<String>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for recipe in &self.recipes {
            let id = recipe.id();
            let names = by_id.entry(id.clone()).or_default();
            if names.is_empty() {
                order.push(id);
            }
            names.push(recipe.name.clone());
        }

        order
            .into_iter()
            .filter_map(|id| {
                let names = by_id.remove(&id)?;
                (names.len() > 1).then_some((id, names))
            })
            .collect()
    }
}

async fn read_document(source: &DatasetSource, timeout: Duration) -> Result<Value, FinderError> {
    match source {
        DatasetSource::File(path) => {
            debug!("Reading dataset from {}", path.display());
            let body = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&body)?)
        }
        DatasetSource::Url(url) => {
            let fetcher = RequestFetcher::new(Some(timeout + CLIENT_TIMEOUT_GRACE))?;
            fetcher.fetch_json(url, &[]).await
        }
    }
}

/// Convert a JSON document into recipe records.
///
/// Anything other than an array yields no recipes. Entries that are not
/// objects or have no non-empty name are skipped; other fields that are
/// null or of the wrong type fall back to empty values.
pub fn recipes_from_value(document: Value) -> Vec<Recipe> {
    let Value::Array(entries) = document else {
        warn!("Recipe document is not an array; treating it as empty");
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Recipe>(entry) {
            Ok(recipe) if !recipe.name.trim().is_empty() => Some(recipe),
            Ok(_) => {
                debug!("Skipping recipe without a name");
                None
            }
            Err(e) => {
                debug!("Skipping malformed recipe entry: {}", e);
                None
            }
        })
        .collect()
}
