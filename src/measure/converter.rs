//! Unit conversion functions
//!
//! Converts quantities between units, same-type through base factors and
//! volume <-> mass through ingredient overrides or densities.

use thiserror::Error;

use super::units::{normalize_unit, MeasurementSystem, UnitDefinition, UnitTable, UnitType};

/// Conversion error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert between {from} and {to} without ingredient information")]
    MissingIngredientContext { from: UnitType, to: UnitType },

    #[error("Cannot convert {from} to {to} for '{ingredient}': no density information available")]
    NoConversionData {
        ingredient: String,
        from: String,
        to: String,
    },

    #[error("Cannot convert {from} to {to}: count units only convert to count units")]
    IncompatibleUnits { from: String, to: String },
}

/// Result type for conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Metric display candidates, most preferred first
const METRIC_MASS: &[&str] = &["g", "kg"];
const METRIC_VOLUME: &[&str] = &["ml", "l"];
/// Imperial / US display candidates, most preferred first
const IMPERIAL_MASS: &[&str] = &["oz", "lb"];
const IMPERIAL_VOLUME: &[&str] = &["tsp", "tbsp", "cup", "fl oz", "pt", "qt", "gal"];
const COUNT_UNITS: &[&str] = &["count"];

/// Range a display candidate's value must fall in to be picked
const DISPLAY_MIN: f64 = 0.25;
const DISPLAY_MAX: f64 = 1000.0;

/// Common fractions for converter output, with the decimals they match
const COMMON_FRACTIONS: &[(f64, &str)] = &[
    (0.125, "1/8"),
    (0.25, "1/4"),
    (0.333, "1/3"),
    (0.5, "1/2"),
    (0.667, "2/3"),
    (0.75, "3/4"),
];

const FRACTION_TOLERANCE: f64 = 0.02;

/// Converts quantities using a shared [`UnitTable`]
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter<'t> {
    table: &'t UnitTable,
}

impl<'t> UnitConverter<'t> {
    pub fn new(table: &'t UnitTable) -> Self {
        Self { table }
    }

    /// The table this converter reads from
    pub fn table(&self) -> &'t UnitTable {
        self.table
    }

    fn resolve(&self, unit: &str) -> ConversionResult<&'t UnitDefinition> {
        self.table
            .lookup(unit)
            .ok_or_else(|| ConversionError::UnknownUnit(unit.trim().to_string()))
    }

    /// Convert a quantity from one unit to another
    ///
    /// `ingredient` is only consulted for volume <-> mass conversions.
    pub fn convert(
        &self,
        quantity: f64,
        from_unit: &str,
        to_unit: &str,
        ingredient: Option<&str>,
    ) -> ConversionResult<f64> {
        let from = self.resolve(from_unit)?;
        let to = self.resolve(to_unit)?;

        if normalize_unit(from_unit) == normalize_unit(to_unit) {
            return Ok(quantity);
        }

        match (from.unit_type, to.unit_type) {
            // Counts are never renormalized
            (UnitType::Count, UnitType::Count) => Ok(quantity),
            (a, b) if a == b => Ok(quantity * from.to_base_factor / to.to_base_factor),
            (UnitType::Count, _) | (_, UnitType::Count) => Err(ConversionError::IncompatibleUnits {
                from: from.symbol.clone(),
                to: to.symbol.clone(),
            }),
            (a, b) => {
                let ingredient = ingredient
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or(ConversionError::MissingIngredientContext { from: a, to: b })?;
                self.convert_cross_type(quantity, from, to, ingredient)
            }
        }
    }

    /// Volume <-> mass using an override first, then a density
    fn convert_cross_type(
        &self,
        quantity: f64,
        from: &UnitDefinition,
        to: &UnitDefinition,
        ingredient: &str,
    ) -> ConversionResult<f64> {
        let volume_to_mass = from.unit_type == UnitType::Volume;

        if volume_to_mass {
            if let Some(grams_per) = self.table.override_for(ingredient, &from.symbol) {
                return Ok(quantity * grams_per / to.to_base_factor);
            }
        } else if let Some(grams_per) = self.table.override_for(ingredient, &to.symbol) {
            return Ok(quantity * from.to_base_factor / grams_per);
        }

        let density = self.table.density_for(ingredient).ok_or_else(|| {
            ConversionError::NoConversionData {
                ingredient: ingredient.to_lowercase(),
                from: from.symbol.clone(),
                to: to.symbol.clone(),
            }
        })?;

        if volume_to_mass {
            // ml * (g/ml) = g
            let grams = quantity * from.to_base_factor * density;
            Ok(grams / to.to_base_factor)
        } else {
            // g / (g/ml) = ml
            let ml = quantity * from.to_base_factor / density;
            Ok(ml / to.to_base_factor)
        }
    }

    /// Express a quantity in the target measurement system, rounded for reading.
    ///
    /// Picks the first candidate unit whose value lands in [0.25, 1000];
    /// keeps the original unit when none does.
    pub fn format_for_display(
        &self,
        quantity: f64,
        unit: &str,
        target: MeasurementSystem,
        ingredient: Option<&str>,
    ) -> (f64, String) {
        let unit = normalize_unit(unit);
        let Some(def) = self.table.lookup(&unit) else {
            return (quantity, unit);
        };

        if def.system.displays_in(target) || target == MeasurementSystem::Universal {
            return humanize_quantity(quantity, &unit);
        }

        for candidate in display_candidates(def.unit_type, target) {
            match self.convert(quantity, &unit, candidate, ingredient) {
                Ok(converted) if (DISPLAY_MIN..=DISPLAY_MAX).contains(&converted) => {
                    return humanize_quantity(converted, candidate);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping display candidate '{}': {}", candidate, e);
                }
            }
        }

        humanize_quantity(quantity, &unit)
    }
}

fn display_candidates(unit_type: UnitType, target: MeasurementSystem) -> &'static [&'static str] {
    let metric = target == MeasurementSystem::Metric;
    match unit_type {
        UnitType::Mass if metric => METRIC_MASS,
        UnitType::Volume if metric => METRIC_VOLUME,
        UnitType::Mass => IMPERIAL_MASS,
        UnitType::Volume => IMPERIAL_VOLUME,
        UnitType::Count => COUNT_UNITS,
    }
}

/// Round for reading: 2 places below 1, 1 place below 10, whole above
pub fn humanize_quantity(quantity: f64, unit: &str) -> (f64, String) {
    let rounded = if quantity < 1.0 {
        (quantity * 100.0).round() / 100.0
    } else if quantity < 10.0 {
        (quantity * 10.0).round() / 10.0
    } else {
        quantity.round()
    };
    (rounded, unit.to_string())
}

/// Match a decimal to a common fraction within ±0.02.
///
/// Returns e.g. "1/2" for 0.5 or "2 3/4" for 2.75; `None` when nothing is close.
pub fn common_fraction(decimal: f64) -> Option<String> {
    let whole = decimal.trunc();
    let remainder = decimal - whole;

    COMMON_FRACTIONS
        .iter()
        .find(|(value, _)| (remainder - value).abs() < FRACTION_TOLERANCE)
        .map(|(_, fraction)| {
            if whole > 0.0 {
                format!("{} {}", whole as i64, fraction)
            } else {
                fraction.to_string()
            }
        })
}
