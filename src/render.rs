//! Text and HTML presentation of search results.

use crate::model::Recipe;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;
use chrono::{DateTime, Utc};

pub const NO_RESULTS_MESSAGE: &str = "No recipes found. Try different ingredients!";
pub const NO_ONLINE_RESULTS_MESSAGE: &str = "No AI recipes found. Try different ingredients!";
pub const API_UNAVAILABLE_MESSAGE: &str = "API temporarily unavailable";

const FALLBACK_TITLE: &str = "Delicious Recipe";
const FALLBACK_DESCRIPTION: &str = "A wonderful recipe to try";
const FALLBACK_TIME: &str = "30 mins";

/// Summary card shown for each search result
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time: String,
    pub image: Option<String>,
    pub likes: u64,
}

impl RecipeCard {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        RecipeCard {
            id: recipe.id(),
            title: non_blank(Some(&recipe.name)).unwrap_or(FALLBACK_TITLE).to_string(),
            description: non_blank(recipe.description.as_deref())
                .unwrap_or(FALLBACK_DESCRIPTION)
                .to_string(),
            time: non_blank(recipe.time.as_deref())
                .unwrap_or(FALLBACK_TIME)
                .to_string(),
            image: recipe.image.clone(),
            likes: 0,
        }
    }

    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }

    pub fn to_text(&self) -> String {
        format!(
            "{}\n  {}\n  ⏱️ {}  ♥ {}",
            self.title, self.description, self.time, self.likes
        )
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="recipe-card" data-recipe-id="{}">"#,
            encode_double_quoted_attribute(&self.id)
        );
        html.push_str(r#"<div class="recipe-image">"#);
        if let Some(image) = &self.image {
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}">"#,
                encode_double_quoted_attribute(image),
                encode_double_quoted_attribute(&self.title)
            );
        }
        html.push_str(r#"<div class="recipe-emoji">🍛</div></div>"#);
        let _ = write!(
            html,
            r#"<div class="recipe-content"><h3 class="recipe-title">{}</h3><p class="recipe-description">{}</p>"#,
            encode_text(&self.title),
            encode_text(&self.description)
        );
        let _ = write!(
            html,
            r#"<div class="recipe-meta"><span class="recipe-time">{}</span><span class="recipe-likes">{}</span></div></div></div>"#,
            encode_text(&self.time),
            self.likes
        );
        html
    }
}

/// Rendered result list
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Cards(Vec<RecipeCard>),
    Empty(&'static str),
}

impl Rendered {
    pub fn to_text(&self) -> String {
        match self {
            Rendered::Cards(cards) => cards
                .iter()
                .map(RecipeCard::to_text)
                .collect::<Vec<_>>()
                .join("\n\n"),
            Rendered::Empty(message) => message.to_string(),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Rendered::Cards(cards) => cards.iter().map(RecipeCard::to_html).collect(),
            Rendered::Empty(message) => {
                format!(r#"<div class="no-results">{}</div>"#, encode_text(message))
            }
        }
    }
}

/// Turn already-capped results into cards, or the empty-state message
pub fn render_results<'a, I>(recipes: I) -> Rendered
where
    I: IntoIterator<Item = &'a Recipe>,
{
    render_results_or(recipes, NO_RESULTS_MESSAGE)
}

/// Like [`render_results`] with a caller-chosen empty-state message
pub fn render_results_or<'a, I>(recipes: I, empty: &'static str) -> Rendered
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let cards: Vec<RecipeCard> = recipes.into_iter().map(RecipeCard::from_recipe).collect();
    if cards.is_empty() {
        Rendered::Empty(empty)
    } else {
        Rendered::Cards(cards)
    }
}

/// Full recipe view: ingredients, steps and the optional video link
#[derive(Debug, Clone)]
pub struct RecipeDetail<'a> {
    recipe: &'a Recipe,
}

impl<'a> RecipeDetail<'a> {
    pub fn new(recipe: &'a Recipe) -> Self {
        RecipeDetail { recipe }
    }

    pub fn to_text(&self) -> String {
        let recipe = self.recipe;
        let mut out = String::new();
        let _ = writeln!(out, "{}", recipe.name);
        if let Some(description) = non_blank(recipe.description.as_deref()) {
            let _ = writeln!(out, "{}", description);
        }
        out.push_str("\nIngredients\n");
        for ingredient in &recipe.ingredients {
            let _ = writeln!(out, "  • {}", ingredient);
        }
        out.push_str("\nInstructions\n");
        for (i, step) in recipe.steps.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, step);
        }
        if !recipe.benefits.is_empty() {
            out.push_str("\nBenefits\n");
            for benefit in &recipe.benefits {
                let _ = writeln!(out, "  - {}", benefit);
            }
        }
        if let Some(video) = non_blank(recipe.youtube.as_deref()) {
            let _ = writeln!(out, "\nWatch Video: {}", video);
        }
        out
    }

    pub fn to_html(&self) -> String {
        let recipe = self.recipe;
        let mut html = String::from(r#"<div class="recipe-modal">"#);
        let _ = write!(html, "<h2>{}</h2>", encode_text(&recipe.name));
        if let Some(description) = non_blank(recipe.description.as_deref()) {
            let _ = write!(
                html,
                r#"<p class="recipe-description">{}</p>"#,
                encode_text(description)
            );
        }
        html.push_str(r#"<h3>Ingredients</h3><ul class="ingredients">"#);
        for ingredient in &recipe.ingredients {
            let _ = write!(html, "<li>{}</li>", encode_text(ingredient));
        }
        html.push_str(r#"</ul><h3>Instructions</h3><ol class="steps">"#);
        for step in &recipe.steps {
            let _ = write!(html, "<li>{}</li>", encode_text(step));
        }
        html.push_str("</ol>");
        if !recipe.benefits.is_empty() {
            html.push_str(r#"<h3>Benefits</h3><ul class="benefits">"#);
            for benefit in &recipe.benefits {
                let _ = write!(html, "<li>{}</li>", encode_text(benefit));
            }
            html.push_str("</ul>");
        }
        if let Some(video) = non_blank(recipe.youtube.as_deref()) {
            let _ = write!(
                html,
                r#"<a class="video" href="{}" target="_blank">Watch Video</a>"#,
                encode_double_quoted_attribute(video)
            );
        }
        html.push_str("</div>");
        html
    }
}

/// Short relative label for a past moment: "Just now", "5m ago", "3h ago",
/// "2d ago", or the calendar date (UTC) after a week
pub fn format_time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
