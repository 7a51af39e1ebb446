//! Kitchen tools module
//!
//! Recipe scaling and shopping list generation built on the measure module.

pub mod categories;
pub mod scaling;
pub mod shopping_list;

pub use categories::{categorize_ingredient, category_rank, IngredientCategory, DISPLAY_ORDER};
pub use scaling::{scale_quantity, scale_recipe, ScaleError, ScaledIngredient, ScaledRecipe};
pub use shopping_list::{Consolidated, IngredientOccurrence, ShoppingListAggregator};
