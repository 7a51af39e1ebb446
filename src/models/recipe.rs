//! Recipe model
//!
//! The read-only recipe shape handed in by the recipe store.

use serde::{Deserialize, Serialize};

use super::Quantity;

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_name: String,
    pub quantity: Quantity,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub preparation: Option<String>,
    /// Category stored with the ingredient, if the user assigned one
    #[serde(default)]
    pub category: Option<String>,
}

impl RecipeIngredient {
    pub fn new(
        ingredient_name: impl Into<String>,
        quantity: impl Into<Quantity>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
            preparation: None,
            category: None,
        }
    }

    pub fn with_preparation(mut self, preparation: impl Into<String>) -> Self {
        self.preparation = Some(preparation.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub total_time_minutes: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Only used by the presentation layer
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, servings: Option<u32>) -> Self {
        Self {
            title: title.into(),
            description: None,
            instructions: None,
            servings,
            prep_time_minutes: None,
            cook_time_minutes: None,
            total_time_minutes: None,
            ingredients: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Append an ingredient line
    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let recipe = Recipe::new("Pancakes", Some(4))
            .with_ingredient(RecipeIngredient::new("flour", 2.0, "cups").with_preparation("sifted"))
            .with_ingredient(RecipeIngredient::new("salt", "to taste", ""));

        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].preparation.as_deref(), Some("sifted"));
        assert_eq!(recipe.ingredients[1].quantity, Quantity::Text("to taste".to_string()));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "title": "Soup",
            "servings": 2,
            "ingredients": [
                {"ingredient_name": "water", "quantity": 1, "unit": "l"},
                {"ingredient_name": "carrots", "quantity": "2-3"}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.servings, Some(2));
        assert_eq!(recipe.ingredients[0].quantity, Quantity::Numeric(1.0));
        assert_eq!(recipe.ingredients[1].unit, "");
        assert!(recipe.tags.is_empty());
    }
}
