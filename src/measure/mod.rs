//! Measurement module
//!
//! Unit knowledge, conversions and quantity formatting.

pub mod converter;
pub mod fraction;
pub mod units;

pub use converter::{
    common_fraction, humanize_quantity, ConversionError, ConversionResult, UnitConverter,
};
pub use fraction::{
    format_quantity_as_fraction, is_invariant_unit, pluralize, round_to, should_pluralize,
    unit_for_amount,
};
pub use units::{
    normalize_unit, MeasurementSystem, OverrideEntry, UnitDefinition, UnitEntry, UnitTable,
    UnitTableData, UnitType,
};
