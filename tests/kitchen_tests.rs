//! End-to-end tests: scaling, conversion and shopping lists over one shared unit table

use kitchen_measure::measure::ConversionError;
use kitchen_measure::tools::IngredientCategory;
use kitchen_measure::{
    scale_recipe, ConfigError, ConsolidationSettings, MeasurementSystem, Quantity, Recipe,
    RecipeIngredient, ShoppingListAggregator, UnitConverter, UnitTable,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn weeknight_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Chili", Some(6))
            .with_ingredient(RecipeIngredient::new("ground beef", 1.0, "lb"))
            .with_ingredient(RecipeIngredient::new("onion", 1.0, "whole").with_preparation("diced"))
            .with_ingredient(RecipeIngredient::new("chili powder", 2.0, "tbsp"))
            .with_ingredient(
                RecipeIngredient::new("kidney beans", 15.0, "oz").with_category("Pantry"),
            ),
        Recipe::new("Tacos", Some(4))
            .with_ingredient(RecipeIngredient::new("ground beef", 8.0, "oz"))
            .with_ingredient(
                RecipeIngredient::new("onion", "1/2", "whole")
                    .with_preparation("1/2 onion, chopped"),
            )
            .with_ingredient(RecipeIngredient::new("chili powder", 1.0, "tsp"))
            .with_ingredient(RecipeIngredient::new("cheddar", 1.0, "cup").with_preparation("shredded")),
    ]
}

#[test]
fn test_weeknight_shopping_list() {
    init_tracing();
    let table = UnitTable::standard();
    let aggregator = ShoppingListAggregator::new(&table);

    let list = aggregator.aggregate(&weeknight_recipes());
    assert_eq!(list.len(), 5);

    let beef = list.find("ground beef").unwrap();
    assert_eq!(beef.category, IngredientCategory::Meat.as_str());
    assert_eq!(beef.quantity, Quantity::Text("1 lb 8 oz".to_string()));
    assert_eq!(beef.unit, "");
    assert!(beef.source_recipe_titles.contains("Chili"));
    assert!(beef.source_recipe_titles.contains("Tacos"));

    let onion = list.find("onion").unwrap();
    assert_eq!(onion.quantity, Quantity::Numeric(1.5));
    assert_eq!(onion.unit, "whole");
    assert_eq!(onion.preparations.len(), 1);
    assert!(onion.preparations.contains("diced"));

    let chili = list.find("chili powder").unwrap();
    assert_eq!(chili.category, "Seasonings");
    assert_eq!(chili.quantity, Quantity::Text("2 tbsp 1 tsp".to_string()));

    assert_eq!(list.find("kidney beans").unwrap().category, "Pantry");
}

#[test]
fn test_weeknight_shopping_list_text() {
    init_tracing();
    let table = UnitTable::standard();
    let aggregator = ShoppingListAggregator::new(&table);
    let list = aggregator.aggregate(&weeknight_recipes());

    let equals = "=".repeat(40);
    let dashes = "-".repeat(40);
    let expected = [
        "SHOPPING LIST",
        equals.as_str(),
        "",
        "",
        "PRODUCE",
        dashes.as_str(),
        "□ 1 1/2 whole onion, diced",
        "",
        "MEAT",
        dashes.as_str(),
        "□ 1 lb 8 oz ground beef",
        "",
        "DAIRY",
        dashes.as_str(),
        "□ 1 cup cheddar, shredded",
        "",
        "SEASONINGS",
        dashes.as_str(),
        "□ 2 tbsp 1 tsp chili powder",
        "",
        "PANTRY",
        dashes.as_str(),
        "□ 15 oz kidney beans",
    ]
    .join("\n");

    assert_eq!(aggregator.format_text(&list), expected);
}

#[test]
fn test_unconvertible_ingredient_does_not_block_list() {
    init_tracing();
    let table = UnitTable::standard();
    let aggregator = ShoppingListAggregator::new(&table);
    let recipes = vec![
        Recipe::new("Paella", Some(4))
            .with_ingredient(RecipeIngredient::new("saffron", 1.0, "pinch"))
            .with_ingredient(RecipeIngredient::new("rice", 2.0, "cups")),
        Recipe::new("Risotto", Some(4))
            .with_ingredient(RecipeIngredient::new("saffron", 0.5, "g"))
            .with_ingredient(RecipeIngredient::new("rice", 1.0, "cup")),
    ];

    let list = aggregator.aggregate(&recipes);
    assert_eq!(
        list.find("saffron").unwrap().quantity,
        Quantity::Text("1 pinch, 1/2 g".to_string())
    );
    assert_eq!(list.find("rice").unwrap().quantity, Quantity::Text("3".to_string()));
    assert_eq!(list.find("rice").unwrap().unit, "cups");
}

#[test]
fn test_scale_then_display_in_metric() {
    init_tracing();
    let table = UnitTable::standard();
    let converter = UnitConverter::new(&table);

    let recipes = weeknight_recipes();
    let scaled = scale_recipe(&recipes[0], 3).unwrap();
    assert_eq!(scaled.scale_factor, 0.5);
    assert_eq!(scaled.ingredients[0].quantity, Quantity::Numeric(0.5));

    let (amount, unit) =
        converter.format_for_display(0.5, &scaled.ingredients[0].unit, MeasurementSystem::Metric, None);
    assert_eq!(unit, "g");
    assert_eq!(amount, 227.0);
}

#[test]
fn test_custom_unit_table() {
    init_tracing();
    let json = r#"{
        "units": [
            {"name": "gram", "symbol": "g", "unit_type": "mass", "system": "metric", "to_base_factor": 1.0},
            {"name": "milliliter", "symbol": "ml", "unit_type": "volume", "system": "metric", "to_base_factor": 1.0},
            {"name": "metric cup", "symbol": "cup", "unit_type": "volume", "system": "metric",
             "to_base_factor": 250.0, "aliases": ["cups"]}
        ],
        "densities": [["water", 1.0]],
        "overrides": [{"ingredient": "flour", "unit": "cups", "grams": 125.0}]
    }"#;
    let table = UnitTable::from_json(json).unwrap();
    let converter = UnitConverter::new(&table);

    assert_eq!(converter.convert(2.0, "cups", "g", Some("Flour")).unwrap(), 250.0);
    assert_eq!(converter.convert(1.0, "cup", "g", Some("water")).unwrap(), 250.0);
    assert!(matches!(
        converter.convert(1.0, "tbsp", "ml", None),
        Err(ConversionError::UnknownUnit(_))
    ));
}

#[test]
fn test_invalid_unit_table_rejected() {
    let json = r#"{"units": [
        {"name": "cup", "symbol": "cup", "unit_type": "volume", "system": "us_customary", "to_base_factor": 0.0}
    ]}"#;
    assert!(matches!(
        UnitTable::from_json(json),
        Err(ConfigError::InvalidFactor { .. })
    ));
}

#[test]
fn test_settings_from_json_change_humanizing() {
    init_tracing();
    let table = UnitTable::standard();
    let settings = ConsolidationSettings::from_json(r#"{"max_unit_levels": 1}"#).unwrap();
    let aggregator = ShoppingListAggregator::with_settings(&table, settings);

    let list = aggregator.aggregate(&weeknight_recipes());
    assert_eq!(
        list.find("ground beef").unwrap().quantity,
        Quantity::Text("1".to_string())
    );
    assert_eq!(list.find("ground beef").unwrap().unit, "lb");
}
