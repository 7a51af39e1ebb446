//! Recipe scaling
//!
//! Scales every ingredient of a recipe to a new number of servings.

use serde::Serialize;
use thiserror::Error;

use crate::measure::{format_quantity_as_fraction, round_to};
use crate::models::{parse_number, Quantity, Recipe, RecipeIngredient};

/// Scaling error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("Invalid servings: {0}")]
    InvalidServings(String),
}

/// A scaled ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub ingredient_name: String,
    pub quantity: Quantity,
    pub unit: String,
    pub preparation: Option<String>,
}

/// A recipe scaled to a new serving count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe {
    pub title: String,
    pub original_title: String,
    pub servings: u32,
    pub original_servings: u32,
    pub scale_factor: f64,
    pub description: Option<String>,
    /// Unchanged; large factors may need manual adjustment
    pub instructions: Option<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub total_time_minutes: Option<u32>,
    pub ingredients: Vec<ScaledIngredient>,
}

impl ScaledRecipe {
    /// One line per ingredient: "{qty} {unit} {name}[, {preparation}]"
    pub fn format_ingredients_text(&self) -> String {
        self.ingredients
            .iter()
            .map(|ing| {
                let quantity = match &ing.quantity {
                    Quantity::Numeric(v) => format_quantity_as_fraction(*v),
                    Quantity::Text(s) => s.clone(),
                };

                let mut line = quantity;
                if !ing.unit.trim().is_empty() {
                    line.push(' ');
                    line.push_str(ing.unit.trim());
                }
                line.push(' ');
                line.push_str(&ing.ingredient_name);

                if let Some(prep) = ing.preparation.as_deref().filter(|p| !p.trim().is_empty()) {
                    line.push_str(", ");
                    line.push_str(prep);
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Scale a recipe to `target_servings`
pub fn scale_recipe(recipe: &Recipe, target_servings: u32) -> Result<ScaledRecipe, ScaleError> {
    let original_servings = match recipe.servings {
        Some(s) if s > 0 => s,
        _ => {
            return Err(ScaleError::InvalidServings(
                "Original recipe must have a valid servings count".to_string(),
            ))
        }
    };

    if target_servings == 0 {
        return Err(ScaleError::InvalidServings(
            "Target servings must be greater than 0".to_string(),
        ));
    }

    let scale_factor = f64::from(target_servings) / f64::from(original_servings);

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ing| scale_ingredient(ing, scale_factor))
        .collect();

    Ok(ScaledRecipe {
        title: format!("{} (scaled to {} servings)", recipe.title, target_servings),
        original_title: recipe.title.clone(),
        servings: target_servings,
        original_servings,
        scale_factor,
        description: recipe.description.clone(),
        instructions: recipe.instructions.clone(),
        prep_time_minutes: recipe.prep_time_minutes,
        cook_time_minutes: recipe.cook_time_minutes,
        total_time_minutes: recipe.total_time_minutes,
        ingredients,
    })
}

fn scale_ingredient(ingredient: &RecipeIngredient, scale_factor: f64) -> ScaledIngredient {
    ScaledIngredient {
        ingredient_name: ingredient.ingredient_name.clone(),
        quantity: scale_quantity(&ingredient.quantity, scale_factor),
        unit: ingredient.unit.clone(),
        preparation: ingredient.preparation.clone(),
    }
}

/// Scale one quantity.
///
/// Numbers are rounded to 3 places, "A-B" ranges scale both ends (2 places),
/// anything else is returned unchanged.
pub fn scale_quantity(quantity: &Quantity, scale_factor: f64) -> Quantity {
    if let Some(value) = quantity.value() {
        return Quantity::Numeric(round_to(value * scale_factor, 3));
    }

    let Quantity::Text(text) = quantity else {
        return quantity.clone();
    };

    if let Some((low, high)) = text.split_once('-') {
        if let (Some(low), Some(high)) = (parse_number(low), parse_number(high)) {
            return Quantity::Text(format!(
                "{:?}-{:?}",
                round_to(low * scale_factor, 2),
                round_to(high * scale_factor, 2)
            ));
        }
    }

    tracing::debug!("Leaving unparseable quantity '{}' unscaled", text);
    quantity.clone()
}
