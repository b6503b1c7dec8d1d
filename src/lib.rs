//! Find recipes by the ingredients you already have.
//!
//! Free ingredient text is parsed into tokens, matched against a recipe
//! dataset loaded once per session, and rendered as cards. Likes, saves,
//! views and comments go through a pluggable document store.

pub mod activity;
pub mod auth;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetcher;
pub mod matcher;
pub mod model;
pub mod online;
pub mod parser;
pub mod render;
pub mod search;
pub mod store;

pub use activity::{
    Comment, LikeOutcome, RecipeActivity, Review, SavedRecipe, UserComment, UserProfile,
};
pub use auth::{AuthProvider, MemoryAuth, Session, User};
pub use config::FinderConfig;
pub use dataset::{Dataset, DatasetSource};
pub use error::FinderError;
pub use matcher::{filter_by_query, filter_recipes, matches};
pub use model::{recipe_id, Recipe};
pub use online::OnlineSearch;
pub use parser::parse_ingredients;
pub use render::{
    format_time_ago, render_results, render_results_or, RecipeCard, RecipeDetail, Rendered,
};
pub use search::{RecipeSearch, RecipeSearchBuilder, SearchMode, SearchOutcome};
pub use store::{DocumentStore, HttpStore, MemoryStore};

/// Load the configured dataset and run an offline search in one call.
///
/// A failed load degrades to an empty dataset, so the result is then empty.
pub async fn find_recipes(
    config: &FinderConfig,
    ingredients: &str,
) -> Result<SearchOutcome, FinderError> {
    let source = DatasetSource::parse(&config.dataset.source);
    let (dataset, _) = Dataset::load_or_empty(&source, config.dataset.timeout()).await;

    RecipeSearch::builder()
        .ingredients(ingredients)
        .limit(config.search.display_limit)
        .dataset(&dataset)
        .run()
        .await
}
