//! Data models
//!
//! Plain structs exchanged with the recipe store and presentation layer.

mod quantity;
mod recipe;
mod shopping_item;

pub use quantity::{parse_number, Quantity};
pub use recipe::{Recipe, RecipeIngredient};
pub use shopping_item::{ConsolidatedItem, ShoppingList};
