//! Shopping list generation
//!
//! Merges ingredient lines across recipes, sums them where the units allow
//! it and re-expresses totals in kitchen units ("1 lb 8 oz").

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::categories::categorize_ingredient;
use crate::config::ConsolidationSettings;
use crate::measure::units::{
    G_PER_KG, G_PER_LB, G_PER_OZ, ML_PER_CUP, ML_PER_FL_OZ, ML_PER_GALLON, ML_PER_LITER,
    ML_PER_PINT, ML_PER_QUART, ML_PER_TBSP, ML_PER_TSP,
};
use crate::measure::{
    format_quantity_as_fraction, is_invariant_unit, normalize_unit, pluralize, should_pluralize,
    unit_for_amount, UnitConverter, UnitTable, UnitType,
};
use crate::models::{ConsolidatedItem, Quantity, Recipe, ShoppingList};

/// Volume units, largest first (symbol, ml)
const VOLUME_HIERARCHY: &[(&str, f64)] = &[
    ("gallon", ML_PER_GALLON),
    ("quart", ML_PER_QUART),
    ("pint", ML_PER_PINT),
    ("cup", ML_PER_CUP),
    ("fl oz", ML_PER_FL_OZ),
    ("tbsp", ML_PER_TBSP),
    ("tsp", ML_PER_TSP),
    ("l", ML_PER_LITER),
    ("ml", 1.0),
];

/// Dry goods are bought by the cup, never by the quart
const COOKING_VOLUME_HIERARCHY: &[(&str, f64)] = &[
    ("cup", ML_PER_CUP),
    ("tbsp", ML_PER_TBSP),
    ("tsp", ML_PER_TSP),
];

/// Mass units, largest first (symbol, g)
const MASS_HIERARCHY: &[(&str, f64)] = &[
    ("lb", G_PER_LB),
    ("oz", G_PER_OZ),
    ("kg", G_PER_KG),
    ("g", 1.0),
];

/// Relative slack when counting whole units. Unit factors carry about six
/// significant digits, so 1/2 cup + 2 tbsp lands a hair under 10 tbsp.
const WHOLE_UNIT_TOLERANCE: f64 = 1e-4;

/// Range a remainder must fall in, in the chosen unit
const REMAINDER_MIN: f64 = 0.1;
const REMAINDER_MAX: f64 = 100.0;

const RULE_WIDTH: usize = 40;

/// One use of an ingredient in one recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientOccurrence {
    pub amount: Quantity,
    pub unit: String,
    pub recipe_title: String,
    pub preparation: Option<String>,
}

/// A consolidated amount; `unit` is empty when `quantity` is composite text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consolidated {
    pub quantity: Quantity,
    pub unit: String,
}

impl Consolidated {
    fn text(quantity: impl Into<String>) -> Self {
        Self {
            quantity: Quantity::Text(quantity.into()),
            unit: String::new(),
        }
    }

    /// Render as one string, e.g. "3 cups"
    fn to_display_text(&self) -> String {
        let amount = self.quantity.to_fraction_string();
        let unit = self.unit.trim();
        if unit.is_empty() {
            amount
        } else {
            format!("{} {}", amount, unit_for_amount(unit, &amount))
        }
    }
}

#[derive(Default)]
struct IngredientGroup {
    occurrences: Vec<IngredientOccurrence>,
    category: Option<String>,
}

/// Builds consolidated shopping lists from recipes
#[derive(Debug, Clone)]
pub struct ShoppingListAggregator<'t> {
    converter: UnitConverter<'t>,
    settings: ConsolidationSettings,
}

impl<'t> ShoppingListAggregator<'t> {
    pub fn new(table: &'t UnitTable) -> Self {
        Self::with_settings(table, ConsolidationSettings::default())
    }

    pub fn with_settings(table: &'t UnitTable, settings: ConsolidationSettings) -> Self {
        Self {
            converter: UnitConverter::new(table),
            settings,
        }
    }

    pub fn settings(&self) -> &ConsolidationSettings {
        &self.settings
    }

    /// Generate a consolidated, categorized shopping list.
    ///
    /// Ingredients are joined on their exact name.
    pub fn aggregate(&self, recipes: &[Recipe]) -> ShoppingList {
        let mut groups: BTreeMap<String, IngredientGroup> = BTreeMap::new();

        for recipe in recipes {
            for ri in &recipe.ingredients {
                let group = groups.entry(ri.ingredient_name.clone()).or_default();
                group.occurrences.push(IngredientOccurrence {
                    amount: ri.quantity.clone(),
                    unit: ri.unit.clone(),
                    recipe_title: recipe.title.clone(),
                    preparation: ri.preparation.clone(),
                });

                if group.category.is_none() {
                    group.category = ri
                        .category
                        .as_deref()
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string);
                }
            }
        }

        let mut list = ShoppingList::default();

        for (name, group) in groups {
            let category = group
                .category
                .unwrap_or_else(|| categorize_ingredient(&name).to_string());

            let source_recipe_titles: BTreeSet<String> = group
                .occurrences
                .iter()
                .map(|o| o.recipe_title.clone())
                .collect();

            let preparations: BTreeSet<String> = group
                .occurrences
                .iter()
                .filter_map(|o| o.preparation.as_deref())
                .filter(|prep| self.is_genuine_preparation(&name, prep))
                .map(|prep| prep.trim().to_string())
                .collect();

            let consolidated = self.consolidate_quantities(&name, &group.occurrences);

            list.categories
                .entry(category.clone())
                .or_default()
                .push(ConsolidatedItem {
                    name,
                    quantity: consolidated.quantity,
                    unit: consolidated.unit,
                    category,
                    source_recipe_titles,
                    preparations,
                });
        }

        for items in list.categories.values_mut() {
            items.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }

        list
    }

    /// Merge every occurrence of one ingredient into a single amount
    pub fn consolidate_quantities(
        &self,
        ingredient_name: &str,
        occurrences: &[IngredientOccurrence],
    ) -> Consolidated {
        if let [only] = occurrences {
            return Consolidated {
                quantity: only.amount.clone(),
                unit: only.unit.clone(),
            };
        }

        let mut numeric: Vec<(f64, &str)> = Vec::new();
        let mut non_numeric: Vec<&IngredientOccurrence> = Vec::new();

        for occurrence in occurrences {
            if occurrence.amount.is_blank() {
                continue;
            }
            match occurrence.amount.value() {
                Some(v) if v > 0.0 => numeric.push((v, occurrence.unit.as_str())),
                _ => non_numeric.push(occurrence),
            }
        }

        if numeric.is_empty() {
            let listed: Vec<String> = non_numeric
                .iter()
                .map(|o| join_amount(&o.amount.to_string(), &o.unit))
                .collect();
            return Consolidated::text(listed.join(", "));
        }

        let consolidated = self.sum_numeric(ingredient_name, &numeric);
        if non_numeric.is_empty() {
            return consolidated;
        }

        let extras: Vec<String> = non_numeric
            .iter()
            .map(|o| join_amount(&o.amount.to_string(), &o.unit))
            .collect();
        Consolidated::text(format!(
            "{} (+ {})",
            consolidated.to_display_text(),
            extras.join(", ")
        ))
    }

    fn sum_numeric(&self, ingredient_name: &str, numeric: &[(f64, &str)]) -> Consolidated {
        let first_unit = normalize_unit(numeric[0].1);
        if numeric.iter().all(|(_, unit)| normalize_unit(unit) == first_unit) {
            return Consolidated {
                quantity: Quantity::Numeric(numeric.iter().map(|(v, _)| v).sum()),
                unit: numeric[0].1.to_string(),
            };
        }

        let table = self.converter.table();
        let unit_types: Option<Vec<UnitType>> =
            numeric.iter().map(|(_, unit)| table.unit_type(unit)).collect();

        let unit_type = match unit_types.as_deref() {
            Some([first, rest @ ..]) if rest.iter().all(|t| t == first) => *first,
            _ => {
                tracing::debug!(
                    "Cannot consolidate '{}': unknown or mixed unit types",
                    ingredient_name
                );
                return list_numeric(numeric);
            }
        };

        let base_unit = table.base_unit_for(unit_type);
        let mut total_base = 0.0;
        for (amount, unit) in numeric {
            // Same-type only: no ingredient context, so cross-type is never attempted
            match self.converter.convert(*amount, unit, base_unit, None) {
                Ok(converted) => total_base += converted,
                Err(e) => {
                    tracing::warn!(
                        "Conversion failed while consolidating '{}': {}. Listing amounts instead.",
                        ingredient_name,
                        e
                    );
                    return list_numeric(numeric);
                }
            }
        }

        self.format_consolidated_unit(total_base, unit_type, ingredient_name)
    }

    /// Express a base-unit total in the largest sensible units.
    ///
    /// E.g. 680.388 g -> "1 lb 8 oz", 709.764 ml of flour -> "3 cups".
    pub fn format_consolidated_unit(
        &self,
        amount: f64,
        unit_type: UnitType,
        ingredient_name: &str,
    ) -> Consolidated {
        let hierarchy = match unit_type {
            UnitType::Count => {
                return Consolidated {
                    quantity: Quantity::Text(format_quantity_as_fraction(amount)),
                    unit: "whole".to_string(),
                };
            }
            UnitType::Volume if self.settings.is_dry_ingredient(ingredient_name) => {
                COOKING_VOLUME_HIERARCHY
            }
            UnitType::Volume => VOLUME_HIERARCHY,
            UnitType::Mass => MASS_HIERARCHY,
        };

        let max_levels = self.settings.max_unit_levels;
        let mut parts: Vec<(String, &str)> = Vec::new();
        let mut remaining = amount;

        for &(symbol, size) in hierarchy {
            if parts.len() >= max_levels {
                break;
            }
            let count = (remaining / size * (1.0 + WHOLE_UNIT_TOLERANCE)).floor();
            if count >= 1.0 {
                parts.push((format_quantity_as_fraction(count), symbol));
                remaining = (remaining - count * size).max(0.0);
            }
        }

        if parts.len() < max_levels && remaining > amount * self.settings.remainder_threshold {
            let remainder = hierarchy.iter().rev().find_map(|&(symbol, size)| {
                let in_unit = remaining / size;
                (REMAINDER_MIN..REMAINDER_MAX)
                    .contains(&in_unit)
                    .then(|| (format_quantity_as_fraction(in_unit), symbol))
            });
            parts.extend(remainder);
        }

        match parts.as_slice() {
            [] => {
                let (symbol, size) = hierarchy[hierarchy.len() - 1];
                Consolidated {
                    quantity: Quantity::Text(format_quantity_as_fraction(amount / size)),
                    unit: symbol.to_string(),
                }
            }
            [(amount, symbol)] => Consolidated {
                quantity: Quantity::Text(amount.clone()),
                unit: unit_for_amount(symbol, amount),
            },
            _ => Consolidated::text(
                parts
                    .iter()
                    .map(|(amount, symbol)| format!("{} {}", amount, unit_for_amount(symbol, amount)))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }

    /// Drop preparation notes that are really mis-parsed ingredient lines:
    /// ones naming the ingredient, a mass/volume unit, or containing digits
    fn is_genuine_preparation(&self, ingredient_name: &str, preparation: &str) -> bool {
        let lower = preparation.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }

        let name = ingredient_name.trim().to_lowercase();
        if !name.is_empty() && lower.contains(&name) {
            return false;
        }

        if lower.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }

        let table = self.converter.table();
        !lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| matches!(table.unit_type(word), Some(UnitType::Mass | UnitType::Volume)))
    }

    /// Render a list as checkbox lines grouped under uppercase category headers
    pub fn format_text(&self, list: &ShoppingList) -> String {
        let mut lines = vec![
            "SHOPPING LIST".to_string(),
            "=".repeat(RULE_WIDTH),
            String::new(),
        ];

        for (category, items) in list.in_display_order() {
            if items.is_empty() {
                continue;
            }

            lines.push(String::new());
            lines.push(category.to_uppercase());
            lines.push("-".repeat(RULE_WIDTH));

            let mut sorted: Vec<&ConsolidatedItem> = items.iter().collect();
            sorted.sort_by_key(|item| item.name.to_lowercase());

            lines.extend(sorted.into_iter().map(|item| self.format_item_line(item)));
        }

        lines.join("\n")
    }

    fn format_item_line(&self, item: &ConsolidatedItem) -> String {
        let value = item.quantity.value();
        let quantity = match value {
            Some(v) => format_quantity_as_fraction(v),
            None => item.quantity.to_string(),
        };

        let mut line = format!("□ {}", quantity);

        let unit = item.unit.trim();
        if !unit.is_empty() {
            let plural = match value {
                Some(v) => v > 1.0,
                None => should_pluralize(&quantity),
            };
            line.push(' ');
            line.push_str(&self.inflect_unit(unit, plural));
        }

        line.push(' ');
        line.push_str(&item.name);

        if !item.preparations.is_empty() {
            line.push_str(", ");
            line.push_str(
                &item
                    .preparations
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }

        line
    }

    /// Plural or singular spelling of a unit; only singularizes to a
    /// spelling the unit table knows
    fn inflect_unit(&self, unit: &str, plural: bool) -> String {
        if plural {
            return pluralize(unit);
        }
        if is_invariant_unit(unit) {
            return unit.to_string();
        }

        let table = self.converter.table();
        ["es", "s"]
            .iter()
            .filter_map(|suffix| unit.strip_suffix(suffix))
            .find(|singular| table.lookup(singular).is_some())
            .unwrap_or(unit)
            .to_string()
    }
}

/// "2 cups", or just the amount when there is no unit
fn join_amount(amount: &str, unit: &str) -> String {
    let unit = unit.trim();
    if unit.is_empty() {
        amount.trim().to_string()
    } else {
        format!("{} {}", amount.trim(), unit)
    }
}

/// "1 cup, 200 g": amounts listed side by side when they can't be summed
fn list_numeric(numeric: &[(f64, &str)]) -> Consolidated {
    let listed: Vec<String> = numeric
        .iter()
        .map(|(amount, unit)| join_amount(&format_quantity_as_fraction(*amount), unit))
        .collect();
    Consolidated::text(listed.join(", "))
}
