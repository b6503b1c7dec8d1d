use crate::dataset::Dataset;
use crate::matcher::filter_recipes;
use crate::model::Recipe;
use crate::online::{validate_online_input, OnlineSearch};
use crate::parser::parse_ingredients;
use crate::render::{
    render_results_or, Rendered, API_UNAVAILABLE_MESSAGE, NO_ONLINE_RESULTS_MESSAGE,
    NO_RESULTS_MESSAGE,
};
use crate::FinderError;
use log::{debug, info, warn};

/// Default number of cards shown per search
pub const DEFAULT_DISPLAY_LIMIT: usize = 6;

/// Where results come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Match against the bundled dataset (default)
    #[default]
    Offline,
    /// Ask the hosted recipe API
    Online,
}

/// Result of a search run
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Mode that produced the results (differs from the requested one after a fallback)
    pub mode: SearchMode,
    pub tokens: Vec<String>,
    /// Matches before the display limit was applied
    pub total_matches: usize,
    /// Matches after the display limit
    pub recipes: Vec<Recipe>,
    /// Message for the user alongside the results
    pub notice: Option<String>,
}

impl SearchOutcome {
    /// Cards for the results, or the empty message for the mode that ran
    pub fn render(&self) -> Rendered {
        let empty = match self.mode {
            SearchMode::Offline => NO_RESULTS_MESSAGE,
            SearchMode::Online => NO_ONLINE_RESULTS_MESSAGE,
        };
        render_results_or(&self.recipes, empty)
    }
}

/// Builder for configuring and running a recipe search
#[derive(Debug, Default)]
pub struct RecipeSearchBuilder<'a> {
    ingredients: Option<String>,
    mode: SearchMode,
    limit: Option<usize>,
    dataset: Option<&'a Dataset>,
    online: Option<OnlineSearch>,
    fallback_to_offline: bool,
}

impl<'a> RecipeSearchBuilder<'a> {
    /// Set the free-text ingredient query
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeSearch;
    ///
    /// let builder = RecipeSearch::builder().ingredients("tomato, onion");
    /// ```
    pub fn ingredients(mut self, text: impl Into<String>) -> Self {
        self.ingredients = Some(text.into());
        self
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Cap the number of returned recipes
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Dataset used for offline matching and as the fallback
    pub fn dataset(mut self, dataset: &'a Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Client used in online mode
    pub fn online(mut self, online: OnlineSearch) -> Self {
        self.online = Some(online);
        self
    }

    /// Retry offline when the online API fails
    pub fn fallback_to_offline(mut self, enabled: bool) -> Self {
        self.fallback_to_offline = enabled;
        self
    }

    /// Run the search
    ///
    /// # Errors
    /// Returns `FinderError` if:
    /// - The mode's data source was not provided
    /// - Online input fails validation
    /// - The online API fails and no offline fallback is configured
    ///
    /// # Example
    /// ```
    /// # use recipe_finder::{Dataset, Recipe, RecipeSearch};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dataset = Dataset::new(vec![Recipe::new("Dal").with_ingredients(["lentil"])]);
    /// let outcome = RecipeSearch::builder()
    ///     .ingredients("lentils")
    ///     .dataset(&dataset)
    ///     .run()
    ///     .await?;
    /// assert_eq!(outcome.recipes.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(self) -> Result<SearchOutcome, FinderError> {
        let limit = self.limit.unwrap_or(DEFAULT_DISPLAY_LIMIT);
        let input = self.ingredients.unwrap_or_default();

        match self.mode {
            SearchMode::Offline => {
                let dataset = self.dataset.ok_or_else(|| {
                    FinderError::Builder(
                        "Offline search needs a dataset. Use .dataset()".to_string(),
                    )
                })?;
                Ok(offline(dataset, &input, limit, None))
            }
            SearchMode::Online => {
                let online = self.online.ok_or_else(|| {
                    FinderError::Builder(
                        "Online search needs a client. Use .online()".to_string(),
                    )
                })?;
                if self.fallback_to_offline && self.dataset.is_none() {
                    return Err(FinderError::Builder(
                        "Offline fallback needs a dataset. Use .dataset()".to_string(),
                    ));
                }

                let query = validate_online_input(&input)?;
                let tokens = parse_ingredients(query);
                match online.search(&tokens).await {
                    Ok(found) => {
                        let total_matches = found.len();
                        Ok(SearchOutcome {
                            mode: SearchMode::Online,
                            tokens,
                            total_matches,
                            recipes: found.into_iter().take(limit).collect(),
                            notice: None,
                        })
                    }
                    Err(e) => match self.dataset {
                        Some(dataset) if self.fallback_to_offline => {
                            warn!("Online search failed, using offline results: {}", e);
                            let notice =
                                format!("{}; showing offline results", API_UNAVAILABLE_MESSAGE);
                            Ok(offline(dataset, &input, limit, Some(notice)))
                        }
                        _ => Err(e),
                    },
                }
            }
        }
    }
}

fn offline(
    dataset: &Dataset,
    input: &str,
    limit: usize,
    notice: Option<String>,
) -> SearchOutcome {
    let tokens = parse_ingredients(input);
    debug!("Offline search tokens: {:?}", tokens);
    let matched = filter_recipes(dataset.recipes(), &tokens);
    info!("Found {} matching recipes for: \"{}\"", matched.len(), input);

    SearchOutcome {
        mode: SearchMode::Offline,
        total_matches: matched.len(),
        recipes: matched.into_iter().take(limit).cloned().collect(),
        tokens,
        notice,
    }
}

/// Main entry point for the builder API
pub struct RecipeSearch;

impl RecipeSearch {
    /// Creates a new builder for searching recipes
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeSearch;
    ///
    /// let builder = RecipeSearch::builder();
    /// ```
    pub fn builder<'a>() -> RecipeSearchBuilder<'a> {
        RecipeSearchBuilder::default()
    }
}
