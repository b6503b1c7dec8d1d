use crate::model::Recipe;
use crate::parser::parse_ingredients;

/// Returns true when any token matches the recipe.
///
/// A token matches if it occurs inside an ingredient, inside the searchable
/// text (name, description, benefits), or if a non-blank ingredient occurs
/// inside the token ("tomatoes" still finds "tomato").
pub fn matches(recipe: &Recipe, tokens: &[String]) -> bool {
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();
    let text = recipe.searchable_text();

    tokens.iter().any(|token| {
        text.contains(token.as_str())
            || ingredients.iter().any(|ingredient| {
                ingredient.contains(token.as_str()) || token.contains(ingredient.as_str())
            })
    })
}

/// Filter recipes by tokens, keeping dataset order.
///
/// An empty token list means no filter and returns every recipe.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], tokens: &[String]) -> Vec<&'a Recipe> {
    if tokens.is_empty() {
        return recipes.iter().collect();
    }
    recipes.iter().filter(|r| matches(r, tokens)).collect()
}

/// Parse `query` and filter `recipes` with the resulting tokens
pub fn filter_by_query<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    filter_recipes(recipes, &parse_ingredients(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<Recipe> {
        vec![
            Recipe::new("Tomato Soup").with_ingredients(["tomato", "salt"]),
            Recipe::new("Dal").with_ingredients(["lentil"]),
        ]
    }

    #[test]
    fn test_or_semantics_across_tokens() {
        let recipes = sample();
        let result = filter_by_query(&recipes, "tomato, onion");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Tomato Soup");
    }

    #[test]
    fn test_union_of_matches() {
        let recipes = sample();
        let result = filter_recipes(&recipes, &tokens(&["lentil", "salt"]));
        let names: Vec<&str> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tomato Soup", "Dal"]);
    }

    #[test]
    fn test_empty_tokens_return_everything() {
        let recipes = sample();
        assert_eq!(filter_recipes(&recipes, &[]).len(), 2);
        assert_eq!(filter_by_query(&recipes, "   \t").len(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_unfiltered() {
        let recipes = sample();
        assert!(filter_by_query(&recipes, "xyz123").is_empty());
    }

    #[test]
    fn test_exact_ingredient_always_included() {
        let recipe = Recipe::new("Something").with_ingredients(["Green Chili", "ghee"]);
        assert!(matches(&recipe, &tokens(&["ghee"])));
    }

    #[test]
    fn test_reverse_containment_for_plural_input() {
        let recipe = Recipe::new("Bharta").with_ingredients(["brinjal"]);
        assert!(matches(&recipe, &tokens(&["brinjals"])));
    }

    #[test]
    fn test_blank_ingredient_does_not_match_everything() {
        let recipe = Recipe::new("Plain").with_ingredients(["", "  "]);
        assert!(!matches(&recipe, &tokens(&["anything"])));
    }

    #[test]
    fn test_matches_description_and_benefits() {
        let by_description = Recipe::new("Kheer").with_description("Creamy rice pudding");
        let by_benefit = Recipe::new("Sprouts").with_benefits(["High in protein"]);
        assert!(matches(&by_description, &tokens(&["rice"])));
        assert!(matches(&by_benefit, &tokens(&["protein"])));
    }

    #[test]
    fn test_bare_recipe_excluded_when_name_misses() {
        let recipe = Recipe::new("Poha");
        assert!(!matches(&recipe, &tokens(&["onion"])));
        assert!(matches(&recipe, &tokens(&["poh"])));
    }

    #[test]
    fn test_ingredient_case_is_ignored() {
        let recipe = Recipe::new("Palak").with_ingredients(["Spinach Leaves"]);
        assert!(matches(&recipe, &tokens(&["spinach"])));
    }
}
