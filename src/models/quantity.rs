//! Quantity model
//!
//! An ingredient amount: either a number or text kept verbatim
//! ("4-6", "to taste").

use serde::{Deserialize, Serialize};

use crate::measure::format_quantity_as_fraction;

/// An ingredient amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Numeric(f64),
    Text(String),
}

impl Quantity {
    /// Parse user text; anything that isn't a plain number, fraction or
    /// mixed number stays as text
    pub fn parse(s: &str) -> Self {
        match parse_number(s) {
            Some(value) => Quantity::Numeric(value),
            None => Quantity::Text(s.trim().to_string()),
        }
    }

    /// Numeric reading of either arm
    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Numeric(v) => Some(*v),
            Quantity::Text(s) => parse_number(s),
        }
    }

    /// Whether this is empty text
    pub fn is_blank(&self) -> bool {
        matches!(self, Quantity::Text(s) if s.trim().is_empty())
    }

    /// Cook-friendly rendering: numbers as fractions, text as-is
    pub fn to_fraction_string(&self) -> String {
        match self.value() {
            Some(v) => format_quantity_as_fraction(v),
            None => self.to_string(),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Numeric(v) => write!(f, "{}", v),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Numeric(value)
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::parse(s)
    }
}

/// Parse "2", "0.5", "1/2" or "1 1/2"; amounts are never negative
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(v) = trimmed.parse::<f64>() {
        return (v.is_finite() && v >= 0.0).then_some(v);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    match words.as_slice() {
        [fraction] => parse_fraction(fraction),
        [whole, fraction] if whole.chars().all(|c| c.is_ascii_digit()) => {
            let whole: f64 = whole.parse().ok()?;
            Some(whole + parse_fraction(fraction)?)
        }
        _ => None,
    }
}

/// Parse "3/4"
fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    if num.is_empty()
        || den.is_empty()
        || !num.chars().all(|c| c.is_ascii_digit())
        || !den.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num.parse::<f64>().ok()? / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Quantity::parse("2"), Quantity::Numeric(2.0));
        assert_eq!(Quantity::parse(" 0.5 "), Quantity::Numeric(0.5));
        assert_eq!(Quantity::parse("1/2"), Quantity::Numeric(0.5));
        assert_eq!(Quantity::parse("1 1/2"), Quantity::Numeric(1.5));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(Quantity::parse("4-6"), Quantity::Text("4-6".to_string()));
        assert_eq!(Quantity::parse("to taste"), Quantity::Text("to taste".to_string()));
        assert_eq!(Quantity::parse("1/0"), Quantity::Text("1/0".to_string()));
        assert_eq!(Quantity::parse("inf"), Quantity::Text("inf".to_string()));
    }

    #[test]
    fn test_negative_amounts_stay_text() {
        assert_eq!(Quantity::parse("-2"), Quantity::Text("-2".to_string()));
        assert_eq!(Quantity::parse("-0.5"), Quantity::Text("-0.5".to_string()));
        assert_eq!(parse_number("-1/2"), None);
        assert_eq!(Quantity::Text("-2".to_string()).value(), None);
        assert_eq!(Quantity::parse("0"), Quantity::Numeric(0.0));
    }

    #[test]
    fn test_value_reads_numeric_text() {
        assert_eq!(Quantity::Text("3".to_string()).value(), Some(3.0));
        assert_eq!(Quantity::Text("a few".to_string()).value(), None);
        assert!(Quantity::Text("  ".to_string()).is_blank());
        assert!(!Quantity::Numeric(0.0).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::Numeric(3.0).to_string(), "3");
        assert_eq!(Quantity::Numeric(2.5).to_string(), "2.5");
        assert_eq!(Quantity::Numeric(1.5).to_fraction_string(), "1 1/2");
        assert_eq!(Quantity::Text("pinch".to_string()).to_fraction_string(), "pinch");
    }

    #[test]
    fn test_serde_untagged() {
        let q: Quantity = serde_json::from_str("2.5").unwrap();
        assert_eq!(q, Quantity::Numeric(2.5));
        let q: Quantity = serde_json::from_str("\"4-6\"").unwrap();
        assert_eq!(q, Quantity::Text("4-6".to_string()));
        assert_eq!(serde_json::to_string(&Quantity::Numeric(1.0)).unwrap(), "1.0");
    }
}
