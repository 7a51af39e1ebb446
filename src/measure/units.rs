//! Unit types and conversion constants
//!
//! Provides the unit table: unit definitions, ingredient densities and
//! ingredient-specific grams-per-unit overrides.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Physical dimension a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Measured in grams
    Mass,
    /// Measured in milliliters
    Volume,
    /// Discrete items (cloves, pieces)
    Count,
}

impl UnitType {
    /// Get the canonical base unit symbol for this type
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitType::Mass => "g",
            UnitType::Volume => "ml",
            UnitType::Count => "count",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mass" | "weight" => Some(UnitType::Mass),
            "volume" => Some(UnitType::Volume),
            "count" => Some(UnitType::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Mass => "mass",
            UnitType::Volume => "volume",
            UnitType::Count => "count",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement system a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
    UsCustomary,
    /// Count units, valid in every system
    Universal,
}

impl MeasurementSystem {
    /// Parse "metric", "imperial", "us_customary" or "universal"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "metric" => Some(MeasurementSystem::Metric),
            "imperial" => Some(MeasurementSystem::Imperial),
            "us_customary" | "us" => Some(MeasurementSystem::UsCustomary),
            "universal" => Some(MeasurementSystem::Universal),
            _ => None,
        }
    }

    /// Whether a unit native to `self` can be shown as-is to a reader of `target`.
    ///
    /// Imperial and US customary share their kitchen units (cup, tbsp, oz),
    /// so either satisfies the other.
    pub fn displays_in(&self, target: MeasurementSystem) -> bool {
        use MeasurementSystem::*;
        match (self, target) {
            (Universal, _) => true,
            (Imperial | UsCustomary, Imperial | UsCustomary) => true,
            (a, b) => *a == b,
        }
    }
}

/// An immutable unit definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub name: String,
    pub symbol: String,
    pub unit_type: UnitType,
    pub system: MeasurementSystem,
    /// Multiplier into the type's base unit (grams, milliliters, count)
    pub to_base_factor: f64,
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;
/// Milliliters per drop
pub const ML_PER_DROP: f64 = 0.05;
/// Milliliters per dash (~1/8 tsp)
pub const ML_PER_DASH: f64 = 0.62;
/// Milliliters per pinch (~1/16 tsp)
pub const ML_PER_PINCH: f64 = 0.31;

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Built-in Data
// ============================================================================

struct UnitSpec {
    name: &'static str,
    symbol: &'static str,
    unit_type: UnitType,
    system: MeasurementSystem,
    factor: f64,
    aliases: &'static [&'static str],
}

const fn unit(
    name: &'static str,
    symbol: &'static str,
    unit_type: UnitType,
    system: MeasurementSystem,
    factor: f64,
    aliases: &'static [&'static str],
) -> UnitSpec {
    UnitSpec {
        name,
        symbol,
        unit_type,
        system,
        factor,
        aliases,
    }
}

use MeasurementSystem::{Imperial, Metric, Universal, UsCustomary};
use UnitType::{Count, Mass, Volume};

const STANDARD_UNITS: &[UnitSpec] = &[
    // Mass (base: grams)
    unit("gram", "g", Mass, Metric, 1.0, &["gram", "grams"]),
    unit("kilogram", "kg", Mass, Metric, G_PER_KG, &["kilogram", "kilograms"]),
    unit("milligram", "mg", Mass, Metric, G_PER_MG, &["milligram", "milligrams"]),
    unit("ounce", "oz", Mass, Imperial, G_PER_OZ, &["ounce", "ounces"]),
    unit("pound", "lb", Mass, Imperial, G_PER_LB, &["lbs", "pound", "pounds"]),
    // Volume (base: milliliters)
    unit(
        "milliliter",
        "ml",
        Volume,
        Metric,
        1.0,
        &["milliliter", "milliliters", "millilitre", "millilitres"],
    ),
    unit(
        "liter",
        "l",
        Volume,
        Metric,
        ML_PER_LITER,
        &["liter", "liters", "litre", "litres"],
    ),
    unit("teaspoon", "tsp", Volume, UsCustomary, ML_PER_TSP, &["teaspoon", "teaspoons"]),
    unit("tablespoon", "tbsp", Volume, UsCustomary, ML_PER_TBSP, &["tablespoon", "tablespoons"]),
    unit("cup", "cup", Volume, UsCustomary, ML_PER_CUP, &["cups"]),
    unit(
        "fluid ounce",
        "fl oz",
        Volume,
        UsCustomary,
        ML_PER_FL_OZ,
        &["floz", "fluid ounce", "fluid ounces"],
    ),
    unit("pint", "pt", Volume, UsCustomary, ML_PER_PINT, &["pint", "pints"]),
    unit("quart", "qt", Volume, UsCustomary, ML_PER_QUART, &["quart", "quarts"]),
    unit("gallon", "gal", Volume, UsCustomary, ML_PER_GALLON, &["gallon", "gallons"]),
    unit("drop", "drop", Volume, UsCustomary, ML_PER_DROP, &["drops"]),
    unit("dash", "dash", Volume, UsCustomary, ML_PER_DASH, &["dashes"]),
    unit("pinch", "pinch", Volume, UsCustomary, ML_PER_PINCH, &["pinches"]),
    // Count
    unit("count", "count", Count, Universal, 1.0, &[]),
    unit("piece", "piece", Count, Universal, 1.0, &["pieces"]),
    unit("whole", "whole", Count, Universal, 1.0, &[]),
    unit("clove", "clove", Count, Universal, 1.0, &["cloves"]),
    unit("item", "item", Count, Universal, 1.0, &["items"]),
    unit("each", "each", Count, Universal, 1.0, &[]),
];

/// Grams per milliliter, in lookup order
const STANDARD_DENSITIES: &[(&str, f64)] = &[
    ("water", 1.0),
    ("milk", 1.03),
    ("cream", 1.01),
    ("butter", 0.911),
    ("oil", 0.92),
    ("honey", 1.42),
    ("sugar", 0.845), // granulated, poured
    ("flour", 0.507), // all-purpose, spooned
    ("salt", 1.217),
];

/// (ingredient, unit symbol) -> grams per unit
const STANDARD_OVERRIDES: &[(&str, &str, f64)] = &[
    ("flour", "cup", 120.0), // spooned and leveled
    ("sugar", "cup", 200.0),
    ("brown sugar", "cup", 220.0), // packed
    ("butter", "cup", 227.0),
    ("butter", "tbsp", 14.2),
    ("honey", "cup", 340.0),
    ("oil", "cup", 218.0),
    ("milk", "cup", 244.0),
    ("water", "cup", 237.0),
    ("salt", "tsp", 6.0),
    ("baking powder", "tsp", 4.8),
    ("baking soda", "tsp", 6.0),
];

// ============================================================================
// Unit Table
// ============================================================================

/// One unit in a JSON unit table, with the extra spellings that resolve to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEntry {
    #[serde(flatten)]
    pub definition: UnitDefinition,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A grams-per-unit override for one ingredient and unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub ingredient: String,
    pub unit: String,
    pub grams: f64,
}

/// Serialized form of a [`UnitTable`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitTableData {
    #[serde(default)]
    pub units: Vec<UnitEntry>,
    #[serde(default)]
    pub densities: Vec<(String, f64)>,
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
}

/// Read-only knowledge of units, densities and overrides.
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct UnitTable {
    definitions: Vec<UnitDefinition>,
    /// normalized spelling -> index into `definitions`
    spellings: HashMap<String, usize>,
    densities: Vec<(String, f64)>,
    overrides: HashMap<(String, String), f64>,
}

/// Lowercase, trim and collapse inner whitespace ("Fl  Oz" -> "fl oz")
pub fn normalize_unit(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl UnitTable {
    /// The built-in kitchen table
    pub fn standard() -> Self {
        Self::from_data(Self::standard_data()).expect("Failed to build built-in unit table")
    }

    /// The built-in table in its serializable form
    pub fn standard_data() -> UnitTableData {
        let units = STANDARD_UNITS
            .iter()
            .map(|spec| UnitEntry {
                definition: UnitDefinition {
                    name: spec.name.to_string(),
                    symbol: spec.symbol.to_string(),
                    unit_type: spec.unit_type,
                    system: spec.system,
                    to_base_factor: spec.factor,
                },
                aliases: spec.aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();

        UnitTableData {
            units,
            densities: STANDARD_DENSITIES
                .iter()
                .map(|(name, d)| (name.to_string(), *d))
                .collect(),
            overrides: STANDARD_OVERRIDES
                .iter()
                .map(|(ingredient, unit, grams)| OverrideEntry {
                    ingredient: ingredient.to_string(),
                    unit: unit.to_string(),
                    grams: *grams,
                })
                .collect(),
        }
    }

    /// Parse a substitute table from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let data: UnitTableData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load a substitute table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Build and validate a table
    pub fn from_data(data: UnitTableData) -> Result<Self, ConfigError> {
        let mut definitions = Vec::with_capacity(data.units.len());
        let mut spellings = HashMap::new();

        for entry in data.units {
            let def = entry.definition;
            if !(def.to_base_factor.is_finite() && def.to_base_factor > 0.0) {
                return Err(ConfigError::InvalidFactor { unit: def.symbol });
            }

            let index = definitions.len();
            let mut names = vec![normalize_unit(&def.symbol)];
            names.extend(entry.aliases.iter().map(|a| normalize_unit(a)));
            names.sort();
            names.dedup();

            for name in names {
                if name.is_empty() || spellings.insert(name.clone(), index).is_some() {
                    return Err(ConfigError::DuplicateAlias(name));
                }
            }
            definitions.push(def);
        }

        let mut densities = Vec::with_capacity(data.densities.len());
        for (name, density) in data.densities {
            if !(density.is_finite() && density > 0.0) {
                return Err(ConfigError::InvalidDensity { ingredient: name });
            }
            densities.push((name.trim().to_lowercase(), density));
        }

        let mut table = Self {
            definitions,
            spellings,
            densities,
            overrides: HashMap::new(),
        };

        for entry in data.overrides {
            if !(entry.grams.is_finite() && entry.grams > 0.0) {
                return Err(ConfigError::InvalidDensity {
                    ingredient: entry.ingredient,
                });
            }
            let unit = table.canonical_symbol(&entry.unit);
            table
                .overrides
                .insert((entry.ingredient.trim().to_lowercase(), unit), entry.grams);
        }

        Ok(table)
    }

    /// Resolve any recognized spelling, case-insensitively
    pub fn lookup(&self, unit: &str) -> Option<&UnitDefinition> {
        self.spellings
            .get(&normalize_unit(unit))
            .map(|&i| &self.definitions[i])
    }

    /// Get the unit type, if the unit is recognized
    pub fn unit_type(&self, unit: &str) -> Option<UnitType> {
        self.lookup(unit).map(|d| d.unit_type)
    }

    /// Base unit symbol for a type
    pub fn base_unit_for(&self, unit_type: UnitType) -> &'static str {
        unit_type.base_unit()
    }

    /// Grams per milliliter for an ingredient.
    ///
    /// Exact match first, then the first entry (in table order) where either
    /// name contains the other.
    pub fn density_for(&self, ingredient: &str) -> Option<f64> {
        let name = ingredient.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        if let Some((_, d)) = self.densities.iter().find(|(key, _)| *key == name) {
            return Some(*d);
        }

        self.densities
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name.as_str()))
            .map(|(_, d)| *d)
    }

    /// Grams per `unit` of an ingredient, exact ingredient name only
    pub fn override_for(&self, ingredient: &str, unit: &str) -> Option<f64> {
        let key = (ingredient.trim().to_lowercase(), self.canonical_symbol(unit));
        self.overrides.get(&key).copied()
    }

    /// Iterate over every definition
    pub fn definitions(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.definitions.iter()
    }

    fn canonical_symbol(&self, unit: &str) -> String {
        match self.lookup(unit) {
            Some(def) => def.symbol.clone(),
            None => normalize_unit(unit),
        }
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_spellings_resolve_to_one_definition() {
        let table = UnitTable::standard();
        let tbsp = table.lookup("tbsp").unwrap();
        assert_eq!(table.lookup("Tablespoon").unwrap(), tbsp);
        assert_eq!(table.lookup(" TABLESPOONS ").unwrap(), tbsp);
        assert_eq!(tbsp.name, "tablespoon");
        assert_eq!(tbsp.unit_type, UnitType::Volume);
    }

    #[test]
    fn test_lookup_multiword_units() {
        let table = UnitTable::standard();
        assert_eq!(table.lookup("fl oz").unwrap().symbol, "fl oz");
        assert_eq!(table.lookup("Fluid  Ounces").unwrap().symbol, "fl oz");
        assert_eq!(table.lookup("oz").unwrap().unit_type, UnitType::Mass);
    }

    #[test]
    fn test_unknown_unit() {
        let table = UnitTable::standard();
        assert!(table.lookup("handful").is_none());
        assert!(table.lookup("").is_none());
        assert_eq!(table.unit_type("scoop"), None);
    }

    #[test]
    fn test_unit_types() {
        let table = UnitTable::standard();
        assert_eq!(table.unit_type("kg"), Some(UnitType::Mass));
        assert_eq!(table.unit_type("cups"), Some(UnitType::Volume));
        assert_eq!(table.unit_type("cloves"), Some(UnitType::Count));
        assert_eq!(table.base_unit_for(UnitType::Mass), "g");
        assert_eq!(table.base_unit_for(UnitType::Volume), "ml");
        assert_eq!(table.base_unit_for(UnitType::Count), "count");
    }

    #[test]
    fn test_density_exact_and_partial() {
        let table = UnitTable::standard();
        assert_eq!(table.density_for("Water"), Some(1.0));
        // ingredient contains key
        assert_eq!(table.density_for("whole milk"), Some(1.03));
        // key contains ingredient
        assert_eq!(table.density_for("flo"), Some(0.507));
        assert_eq!(table.density_for("saffron"), None);
        assert_eq!(table.density_for("  "), None);
    }

    #[test]
    fn test_override_uses_canonical_symbol() {
        let table = UnitTable::standard();
        assert_eq!(table.override_for("flour", "cup"), Some(120.0));
        assert_eq!(table.override_for("Flour", "cups"), Some(120.0));
        assert_eq!(table.override_for("butter", "tablespoon"), Some(14.2));
        assert_eq!(table.override_for("bread flour", "cup"), None);
    }

    #[test]
    fn test_display_system_compatibility() {
        use MeasurementSystem::*;
        assert!(Universal.displays_in(Metric));
        assert!(UsCustomary.displays_in(Imperial));
        assert!(Imperial.displays_in(UsCustomary));
        assert!(!Metric.displays_in(Imperial));
        assert!(!UsCustomary.displays_in(Metric));

        assert_eq!(MeasurementSystem::from_str("US Customary"), Some(UsCustomary));
        assert_eq!(MeasurementSystem::from_str("metric"), Some(Metric));
        assert_eq!(MeasurementSystem::from_str("nautical"), None);
    }

    #[test]
    fn test_from_json_substitute_table() {
        let json = r#"{
            "units": [
                {"name": "gram", "symbol": "g", "unit_type": "mass", "system": "metric",
                 "to_base_factor": 1.0, "aliases": ["grams"]},
                {"name": "mug", "symbol": "mug", "unit_type": "volume", "system": "metric",
                 "to_base_factor": 350.0}
            ],
            "densities": [["soup", 1.1]],
            "overrides": [{"ingredient": "soup", "unit": "mug", "grams": 360.0}]
        }"#;
        let table = UnitTable::from_json(json).unwrap();
        assert_eq!(table.lookup("MUG").unwrap().to_base_factor, 350.0);
        assert!(table.lookup("cup").is_none());
        assert_eq!(table.density_for("tomato soup"), Some(1.1));
        assert_eq!(table.override_for("soup", "mug"), Some(360.0));
    }

    #[test]
    fn test_from_json_rejects_duplicate_alias() {
        let json = r#"{"units": [
            {"name": "a", "symbol": "x", "unit_type": "mass", "system": "metric", "to_base_factor": 1.0},
            {"name": "b", "symbol": "y", "unit_type": "mass", "system": "metric",
             "to_base_factor": 2.0, "aliases": ["X"]}
        ]}"#;
        assert!(matches!(
            UnitTable::from_json(json),
            Err(ConfigError::DuplicateAlias(alias)) if alias == "x"
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_factor() {
        let json = r#"{"units": [
            {"name": "a", "symbol": "x", "unit_type": "mass", "system": "metric", "to_base_factor": 0.0}
        ]}"#;
        assert!(matches!(
            UnitTable::from_json(json),
            Err(ConfigError::InvalidFactor { .. })
        ));
        assert!(matches!(UnitTable::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_bad_density() {
        let json = r#"{"densities": [["water", 0.0]]}"#;
        assert!(matches!(
            UnitTable::from_json(json),
            Err(ConfigError::InvalidDensity { ingredient }) if ingredient == "water"
        ));

        let json = r#"{
            "units": [{"name": "cup", "symbol": "cup", "unit_type": "volume",
                       "system": "us_customary", "to_base_factor": 236.588}],
            "overrides": [{"ingredient": "flour", "unit": "cup", "grams": -120.0}]
        }"#;
        assert!(matches!(
            UnitTable::from_json(json),
            Err(ConfigError::InvalidDensity { ingredient }) if ingredient == "flour"
        ));
    }

    #[test]
    fn test_standard_data_round_trips_through_json() {
        let json = serde_json::to_string(&UnitTable::standard_data()).unwrap();
        let table = UnitTable::from_json(&json).unwrap();
        assert_eq!(table.definitions().count(), STANDARD_UNITS.len());
        assert_eq!(table.lookup("gallons").unwrap().to_base_factor, ML_PER_GALLON);
    }
}
