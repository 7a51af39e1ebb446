//! Ingredient categorization for shopping list grouping
//!
//! Maps ingredient names to store sections by keyword containment. Sections
//! are checked most-specific first so that e.g. "brown sugar" lands in
//! Baking before the generic Pantry keywords get a chance.

use serde::{Deserialize, Serialize};

/// Store section for a shopping list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientCategory {
    Produce,
    Meat,
    Dairy,
    Seasonings,
    Baking,
    Pantry,
    Uncategorized,
}

impl IngredientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "Produce",
            IngredientCategory::Meat => "Meat",
            IngredientCategory::Dairy => "Dairy",
            IngredientCategory::Seasonings => "Seasonings",
            IngredientCategory::Baking => "Baking",
            IngredientCategory::Pantry => "Pantry",
            IngredientCategory::Uncategorized => "Uncategorized",
        }
    }
}

impl std::fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order categories are printed in
pub const DISPLAY_ORDER: &[IngredientCategory] = &[
    IngredientCategory::Produce,
    IngredientCategory::Meat,
    IngredientCategory::Dairy,
    IngredientCategory::Seasonings,
    IngredientCategory::Baking,
    IngredientCategory::Pantry,
    IngredientCategory::Uncategorized,
];

const SEASONING_KEYWORDS: &[&str] = &[
    "black pepper",
    "cayenne pepper",
    "red pepper flakes",
    "pepper flakes",
    "ground black pepper",
    "ground pepper",
    "chili powder",
    "hot pepper sauce",
    "pepper sauce",
    "salt",
    "kosher salt",
    "sea salt",
    "seasoning",
    "oregano",
    "cumin",
    "cinnamon",
    "paprika",
    "hot sauce",
    "tabasco",
    "vanilla extract",
    "extract",
    "liquid smoke",
    "adobo",
    "dried basil",
    "dried oregano",
    "dried minced",
    "spice",
];

const BAKING_KEYWORDS: &[&str] = &[
    "flour",
    "all-purpose flour",
    "baking powder",
    "baking soda",
    "yeast",
    "chocolate chip",
    "cocoa",
    "confectioners",
    "shortening",
    "vegetable shortening",
    "brown sugar",
    "white sugar",
    "sugar",
    "honey",
];

const PRODUCE_KEYWORDS: &[&str] = &[
    "bell pepper",
    "onion",
    "tomato",
    "garlic",
    "cabbage",
    "mushroom",
    "cilantro",
    "parsley",
    "fresh basil",
    "lettuce",
    "carrot",
    "celery",
    "potato",
    "lemon",
    "lime",
    "shallot",
    "scallion",
    "ginger",
    "herb",
];

const MEAT_KEYWORDS: &[&str] = &[
    "beef",
    "pork",
    "chicken",
    "turkey",
    "sausage",
    "bacon",
    "meat",
    "steak",
    "tenderloin",
    "ribs",
    "pate",
    "liver",
    "shrimp",
    "fish",
    "tilapia",
    "salmon",
    "tuna",
    "seafood",
    "skinless",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "milk",
    "cream",
    "cheese",
    "butter",
    "yogurt",
    "sour cream",
    "buttermilk",
    "mozzarella",
    "parmesan",
    "cheddar",
    "dairy",
];

const PANTRY_KEYWORDS: &[&str] = &[
    "oil",
    "olive oil",
    "vinegar",
    "broth",
    "stock",
    "wine",
    "pasta",
    "rice",
    "bread",
    "tortilla",
    "dough",
    "ketchup",
    "soy sauce",
    "pizza sauce",
    "sauce",
    "cornstarch",
    "bourbon",
    "liqueur",
    "juice",
    "egg",
    "walnut",
    "nut",
    "water",
    "puff pastry",
    "pastry",
];

/// Keyword lists in match priority; first hit wins
const MATCH_ORDER: &[(IngredientCategory, &[&str])] = &[
    (IngredientCategory::Seasonings, SEASONING_KEYWORDS),
    (IngredientCategory::Baking, BAKING_KEYWORDS),
    (IngredientCategory::Produce, PRODUCE_KEYWORDS),
    (IngredientCategory::Meat, MEAT_KEYWORDS),
    (IngredientCategory::Dairy, DAIRY_KEYWORDS),
    (IngredientCategory::Pantry, PANTRY_KEYWORDS),
];

/// Categorize an ingredient by name (case-insensitive substring match)
pub fn categorize_ingredient(name: &str) -> IngredientCategory {
    let lower = name.to_lowercase();

    MATCH_ORDER
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(IngredientCategory::Uncategorized)
}

/// Sort key for a category name; names outside [`DISPLAY_ORDER`] sort last
pub fn category_rank(category: &str) -> usize {
    DISPLAY_ORDER
        .iter()
        .position(|c| c.as_str() == category)
        .unwrap_or(DISPLAY_ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasonings_beat_pantry() {
        assert_eq!(categorize_ingredient("kosher salt"), IngredientCategory::Seasonings);
        assert_eq!(categorize_ingredient("Ground Black Pepper"), IngredientCategory::Seasonings);
        assert_eq!(categorize_ingredient("hot sauce"), IngredientCategory::Seasonings);
    }

    #[test]
    fn test_baking_beats_pantry() {
        assert_eq!(categorize_ingredient("brown sugar"), IngredientCategory::Baking);
        assert_eq!(categorize_ingredient("all-purpose flour"), IngredientCategory::Baking);
    }

    #[test]
    fn test_other_sections() {
        assert_eq!(categorize_ingredient("chicken breast"), IngredientCategory::Meat);
        assert_eq!(categorize_ingredient("yellow onion"), IngredientCategory::Produce);
        assert_eq!(categorize_ingredient("cheddar"), IngredientCategory::Dairy);
        assert_eq!(categorize_ingredient("olive oil"), IngredientCategory::Pantry);
        assert_eq!(categorize_ingredient("eggs"), IngredientCategory::Pantry);
    }

    #[test]
    fn test_priority_order_is_first_match() {
        // "bell pepper" is produce, but "pepper flakes" is a seasoning
        assert_eq!(categorize_ingredient("red bell pepper"), IngredientCategory::Produce);
        assert_eq!(categorize_ingredient("red pepper flakes"), IngredientCategory::Seasonings);
        // "garlic salt" hits the seasoning list before produce
        assert_eq!(categorize_ingredient("garlic salt"), IngredientCategory::Seasonings);
    }

    #[test]
    fn test_uncategorized() {
        assert_eq!(categorize_ingredient("xyzfoobar"), IngredientCategory::Uncategorized);
        assert_eq!(categorize_ingredient(""), IngredientCategory::Uncategorized);
    }

    #[test]
    fn test_category_rank() {
        assert_eq!(category_rank("Produce"), 0);
        assert_eq!(category_rank("Uncategorized"), 6);
        assert_eq!(category_rank("Frozen"), 7);
    }
}
