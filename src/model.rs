use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single recipe record from the bundled dataset or the online API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecipe")]
pub struct Recipe {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// Record as found in the wild: any field may be missing, null or of an
/// unexpected type, and the API spells the name two other ways.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecipe {
    name: Option<Value>,
    #[serde(rename = "RecipeName")]
    recipe_name: Option<Value>,
    #[serde(rename = "TranslatedRecipeName")]
    translated_recipe_name: Option<Value>,
    description: Option<Value>,
    ingredients: Option<Value>,
    benefits: Option<Value>,
    steps: Option<Value>,
    time: Option<Value>,
    image: Option<Value>,
    youtube: Option<Value>,
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let name = [raw.name, raw.recipe_name, raw.translated_recipe_name]
            .iter()
            .filter_map(|v| lenient_text(v.as_ref()))
            .find(|n| !n.trim().is_empty())
            .unwrap_or_default();

        Recipe {
            name,
            description: lenient_text(raw.description.as_ref()),
            ingredients: lenient_list(raw.ingredients.as_ref()),
            benefits: lenient_list(raw.benefits.as_ref()),
            steps: lenient_list(raw.steps.as_ref()),
            time: lenient_text(raw.time.as_ref()),
            image: lenient_text(raw.image.as_ref()),
            youtube: lenient_text(raw.youtube.as_ref()),
        }
    }
}

// Strings as-is, numbers in their JSON form, anything else dropped
fn lenient_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| lenient_text(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_benefits<I, S>(mut self, benefits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benefits = benefits.into_iter().map(Into::into).collect();
        self
    }

    /// Key used to correlate this recipe with likes, views and comments
    pub fn id(&self) -> String {
        recipe_id(&self.name)
    }

    /// Name, description and benefits joined into one lower-cased string
    pub fn searchable_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        if let Some(description) = &self.description {
            text.push(' ');
            text.push_str(&description.to_lowercase());
        }
        for benefit in &self.benefits {
            text.push(' ');
            text.push_str(&benefit.to_lowercase());
        }
        text
    }
}

/// Derive a recipe identity from its display name.
///
/// The name is lower-cased and every character outside `[a-z0-9]` becomes
/// `_`. Distinct names can map to the same identity ("Dal-Fry" and
/// "Dal Fry"); [`crate::Dataset::id_collisions`] reports such pairs.
pub fn recipe_id(name: &str) -> String {
    let name = if name.is_empty() { "unknown" } else { name };
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_replaces_punctuation_and_spaces() {
        assert_eq!(recipe_id("Paneer Butter Masala"), "paneer_butter_masala");
        assert_eq!(recipe_id("Aloo-Gobi (Dry)"), "aloo_gobi__dry_");
    }

    #[test]
    fn test_recipe_id_one_underscore_per_character() {
        assert_eq!(recipe_id("Crème brûlée"), "cr_me_br_l_e");
    }

    #[test]
    fn test_recipe_id_empty_name() {
        assert_eq!(recipe_id(""), "unknown");
    }

    #[test]
    fn test_deserialize_with_api_field_names() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"TranslatedRecipeName": "Masala Dosa"}"#).unwrap();
        assert_eq!(recipe.name, "Masala Dosa");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_name_fields_in_priority_order() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"RecipeName": "Masala Karela", "TranslatedRecipeName": "Masala Karela Recipe"}"#,
        )
        .unwrap();
        assert_eq!(recipe.name, "Masala Karela");

        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "  ", "RecipeName": null, "TranslatedRecipeName": "Kadhi"}"#,
        )
        .unwrap();
        assert_eq!(recipe.name, "Kadhi");
    }

    #[test]
    fn test_optional_fields_are_lenient() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "Kheer", "ingredients": ["milk", null, 2], "benefits": null,
                "steps": "boil", "time": 20, "description": false}"#,
        )
        .unwrap();
        assert_eq!(recipe.ingredients, vec!["milk", "2"]);
        assert!(recipe.benefits.is_empty());
        assert!(recipe.steps.is_empty());
        assert_eq!(recipe.time.as_deref(), Some("20"));
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_serialized_recipe_reads_back() {
        let recipe = Recipe::new("Dal")
            .with_ingredients(["lentil"])
            .with_description("Comfort food");
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(serde_json::from_value::<Recipe>(value).unwrap(), recipe);
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "Dal", "ingredients": ["lentil"], "calories": 210}"#,
        )
        .unwrap();
        assert_eq!(recipe.ingredients, vec!["lentil"]);
    }

    #[test]
    fn test_searchable_text() {
        let recipe = Recipe::new("Tomato Soup")
            .with_description("Warm and Tangy")
            .with_benefits(["Rich in Vitamin C"]);
        assert_eq!(
            recipe.searchable_text(),
            "tomato soup warm and tangy rich in vitamin c"
        );
    }
}
