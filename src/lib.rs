//! Kitchen Measure Library
//!
//! Unit conversion, recipe scaling and shopping list consolidation for a
//! recipe manager, served over MCP.

pub mod config;
pub mod mcp;
pub mod measure;
pub mod models;
pub mod tools;

pub use config::{ConfigError, ConsolidationSettings};
pub use measure::{ConversionError, MeasurementSystem, UnitConverter, UnitTable, UnitType};
pub use models::{ConsolidatedItem, Quantity, Recipe, RecipeIngredient, ShoppingList};
pub use tools::{scale_recipe, ScaleError, ScaledRecipe, ShoppingListAggregator};
