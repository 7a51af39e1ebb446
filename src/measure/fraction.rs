//! Fraction formatting and unit pluralization for display

/// Cooking fractions used for display, keyed by the decimals recipes store
/// them as (0.3 for a third, 0.6 for two thirds)
const DISPLAY_FRACTIONS: &[(f64, &str)] = &[
    (0.25, "1/4"),
    (0.3, "1/3"),
    (0.5, "1/2"),
    (0.6, "2/3"),
    (0.75, "3/4"),
];

const DISPLAY_TOLERANCE: f64 = 0.08;

/// Units that read the same in singular and plural
const INVARIANT_UNITS: &[&str] = &[
    "oz", "fl oz", "tbsp", "tsp", "g", "kg", "mg", "ml", "l", "whole", "each",
];

/// Round to a number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Format a quantity the way a cook writes it.
///
/// Examples:
/// - 2.0 -> "2"
/// - 1.5 -> "1 1/2"
/// - 0.333 -> "1/3"
/// - 0.42 -> "0.42"
/// - 2.4 -> "2.4"
pub fn format_quantity_as_fraction(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }

    let whole = value.trunc();
    let decimal = value - whole;

    let closest = DISPLAY_FRACTIONS
        .iter()
        .map(|(dec, frac)| ((decimal - dec).abs(), *frac))
        .filter(|(diff, _)| *diff < DISPLAY_TOLERANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match closest {
        Some((_, frac)) if whole > 0.0 => format!("{} {}", whole as i64, frac),
        Some((_, frac)) => frac.to_string(),
        None if value < 1.0 => format!("{:.2}", value),
        None => format!("{:.1}", value),
    }
}

/// Whether a formatted amount ("3", "1/2", "2 1/2") calls for a plural unit
pub fn should_pluralize(amount: &str) -> bool {
    let trimmed = amount.trim();

    // Mixed number like "2 1/2"
    if trimmed.contains(' ') {
        return true;
    }

    if let Some((num, den)) = trimmed.split_once('/') {
        return match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(n), Ok(d)) if d > 0.0 => n / d > 1.0,
            _ => false,
        };
    }

    trimmed.parse::<f64>().map(|v| v > 1.0).unwrap_or(false)
}

/// Whether a unit symbol keeps its spelling in the plural
pub fn is_invariant_unit(unit: &str) -> bool {
    let lower = unit.trim().to_lowercase();
    INVARIANT_UNITS.contains(&lower.as_str())
}

/// Plural spelling of a unit ("cup" -> "cups", "pinch" -> "pinches", "oz" -> "oz")
pub fn pluralize(unit: &str) -> String {
    if unit.is_empty() || unit.ends_with('s') || is_invariant_unit(unit) {
        unit.to_string()
    } else if ["ch", "sh", "x", "z"].iter().any(|end| unit.ends_with(end)) {
        format!("{}es", unit)
    } else {
        format!("{}s", unit)
    }
}

/// Pluralize `unit` only when `amount` calls for it
pub fn unit_for_amount(unit: &str, amount: &str) -> String {
    if should_pluralize(amount) {
        pluralize(unit)
    } else {
        unit.to_string()
    }
}
