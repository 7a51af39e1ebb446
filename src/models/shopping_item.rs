//! Shopping list model
//!
//! Consolidated ingredients grouped by grocery category.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::Quantity;
use crate::tools::categories::category_rank;

/// One ingredient after merging every recipe that uses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedItem {
    pub name: String,
    /// A total, or composite text such as "1 lb 8 oz" or "1 cup, 200 g"
    pub quantity: Quantity,
    /// Empty when `quantity` already carries its units
    pub unit: String,
    pub category: String,
    pub source_recipe_titles: BTreeSet<String>,
    pub preparations: BTreeSet<String>,
}

/// Shopping list items keyed by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub categories: BTreeMap<String, Vec<ConsolidatedItem>>,
}

impl ShoppingList {
    /// Items in a category, sorted by name
    pub fn items(&self, category: &str) -> &[ConsolidatedItem] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find an item by exact ingredient name
    pub fn find(&self, name: &str) -> Option<&ConsolidatedItem> {
        self.categories
            .values()
            .flat_map(|items| items.iter())
            .find(|item| item.name == name)
    }

    /// Categories in aisle order, unknown categories last
    pub fn in_display_order(&self) -> Vec<(&str, &[ConsolidatedItem])> {
        let mut ordered: Vec<(&str, &[ConsolidatedItem])> = self
            .categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
            .collect();
        ordered.sort_by(|a, b| category_rank(a.0).cmp(&category_rank(b.0)).then(a.0.cmp(b.0)));
        ordered
    }

    /// Total number of items
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str) -> ConsolidatedItem {
        ConsolidatedItem {
            name: name.to_string(),
            quantity: Quantity::Numeric(1.0),
            unit: String::new(),
            category: category.to_string(),
            source_recipe_titles: BTreeSet::new(),
            preparations: BTreeSet::new(),
        }
    }

    #[test]
    fn test_display_order_puts_unknown_last() {
        let mut list = ShoppingList::default();
        for (name, category) in [("flour", "Baking"), ("ice", "Frozen"), ("onion", "Produce")] {
            list.categories
                .entry(category.to_string())
                .or_default()
                .push(item(name, category));
        }

        let order: Vec<&str> = list.in_display_order().iter().map(|(c, _)| *c).collect();
        assert_eq!(order, vec!["Produce", "Baking", "Frozen"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.find("ice").unwrap().category, "Frozen");
        assert!(list.items("Meat").is_empty());
    }
}
