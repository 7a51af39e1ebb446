//! Configuration
//!
//! Tunables for shopping list consolidation and the errors raised while
//! loading configuration or unit tables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unit '{unit}' must have a positive conversion factor")]
    InvalidFactor { unit: String },

    #[error("Ingredient '{ingredient}' must have a positive density or override")]
    InvalidDensity { ingredient: String },

    #[error("Unit spelling '{0}' is claimed by more than one unit")]
    DuplicateAlias(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_max_unit_levels() -> usize {
    2
}

fn default_remainder_threshold() -> f64 {
    0.1
}

fn default_dry_ingredient_keywords() -> Vec<String> {
    ["flour", "sugar", "salt", "powder", "starch", "meal", "rice", "oat"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Settings for re-expressing consolidated totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationSettings {
    /// Most unit levels in one humanized total ("1 lb 14 oz" is two)
    #[serde(default = "default_max_unit_levels")]
    pub max_unit_levels: usize,
    /// Smallest remainder, as a share of the total, that still gets its own term
    #[serde(default = "default_remainder_threshold")]
    pub remainder_threshold: f64,
    /// Name keywords that switch volume totals to cup/tbsp/tsp only
    #[serde(default = "default_dry_ingredient_keywords")]
    pub dry_ingredient_keywords: Vec<String>,
}

impl Default for ConsolidationSettings {
    fn default() -> Self {
        Self {
            max_unit_levels: default_max_unit_levels(),
            remainder_threshold: default_remainder_threshold(),
            dry_ingredient_keywords: default_dry_ingredient_keywords(),
        }
    }
}

impl ConsolidationSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_unit_levels == 0 {
            return Err(ConfigError::InvalidSetting(
                "max_unit_levels must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.remainder_threshold) {
            return Err(ConfigError::InvalidSetting(format!(
                "remainder_threshold must be in [0, 1), got {}",
                self.remainder_threshold
            )));
        }
        Ok(())
    }

    /// Whether the ingredient name matches a dry-goods keyword
    pub fn is_dry_ingredient(&self, ingredient: &str) -> bool {
        let lower = ingredient.to_lowercase();
        self.dry_ingredient_keywords
            .iter()
            .any(|k| lower.contains(k.to_lowercase().as_str()))
    }
}
