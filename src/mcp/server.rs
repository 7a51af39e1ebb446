//! Kitchen Measure MCP Server Implementation
//!
//! Exposes unit conversion, recipe scaling and shopping list tools over MCP.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConsolidationSettings;
use crate::measure::{common_fraction, MeasurementSystem, UnitConverter, UnitTable, UnitType};
use crate::models::{ConsolidatedItem, Quantity, Recipe, RecipeIngredient};
use crate::tools::{categorize_ingredient, scale_recipe, ShoppingListAggregator};

/// Kitchen Measure MCP Service
#[derive(Clone)]
pub struct KitchenService {
    table: Arc<UnitTable>,
    settings: Arc<ConsolidationSettings>,
    tool_router: ToolRouter<KitchenService>,
}

impl KitchenService {
    pub fn new(table: UnitTable, settings: ConsolidationSettings) -> Self {
        Self {
            table: Arc::new(table),
            settings: Arc::new(settings),
            tool_router: Self::tool_router(),
        }
    }

    fn converter(&self) -> UnitConverter<'_> {
        UnitConverter::new(&self.table)
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    /// Amount to convert
    pub quantity: f64,
    /// Unit to convert from (any recognized spelling: "cups", "Tbsp", "fl oz")
    pub from_unit: String,
    /// Unit to convert to
    pub to_unit: String,
    /// Ingredient name, required for volume <-> weight conversions
    pub ingredient: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DisplayQuantityParams {
    pub quantity: f64,
    pub unit: String,
    /// Target system: metric, imperial, us_customary or universal
    pub system: String,
    pub ingredient: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    pub ingredient_name: String,
    /// A number, or text such as "1 1/2", "4-6" or "to taste"
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit: String,
    pub preparation: Option<String>,
    /// Store section; inferred from the name when absent
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeParams {
    pub title: String,
    pub servings: Option<u32>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub total_time_minutes: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleRecipeParams {
    pub recipe: RecipeParams,
    pub target_servings: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateShoppingListParams {
    pub recipes: Vec<RecipeParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUnitsParams {
    /// Filter by type: mass, volume or count
    pub unit_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CategorizeIngredientParams {
    pub name: String,
}

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
struct ConvertUnitsResponse {
    quantity: f64,
    from_unit: String,
    to_unit: String,
    result: f64,
    /// Cook-friendly reading of `result` ("2 3/4")
    display: String,
}

#[derive(Debug, Serialize)]
struct DisplayQuantityResponse {
    quantity: f64,
    unit: String,
}

#[derive(Debug, Serialize)]
struct CategoryGroup<'a> {
    category: &'a str,
    items: &'a [ConsolidatedItem],
}

#[derive(Debug, Serialize)]
struct ShoppingListResponse<'a> {
    recipe_count: usize,
    item_count: usize,
    categories: Vec<CategoryGroup<'a>>,
    text: String,
}

// ============================================================================
// Conversions
// ============================================================================

fn to_quantity(value: &Value) -> Quantity {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| *v >= 0.0)
            .map(Quantity::Numeric)
            .unwrap_or_else(|| Quantity::Text(n.to_string())),
        Value::String(s) => Quantity::parse(s),
        Value::Null => Quantity::Text(String::new()),
        other => Quantity::Text(other.to_string()),
    }
}

impl From<IngredientParams> for RecipeIngredient {
    fn from(p: IngredientParams) -> Self {
        let mut ingredient = RecipeIngredient::new(p.ingredient_name, to_quantity(&p.quantity), p.unit);
        ingredient.preparation = p.preparation;
        ingredient.category = p.category;
        ingredient
    }
}

impl From<RecipeParams> for Recipe {
    fn from(p: RecipeParams) -> Self {
        let mut recipe = Recipe::new(p.title, p.servings);
        recipe.description = p.description;
        recipe.instructions = p.instructions;
        recipe.prep_time_minutes = p.prep_time_minutes;
        recipe.cook_time_minutes = p.cook_time_minutes;
        recipe.total_time_minutes = p.total_time_minutes;
        recipe.ingredients = p.ingredients.into_iter().map(RecipeIngredient::from).collect();
        recipe
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl KitchenService {
    // --- Units ---

    #[tool(description = "List the recognized measurement units with their type, system and conversion factor to the base unit (g, ml or count)")]
    fn list_units(&self, Parameters(p): Parameters<ListUnitsParams>) -> Result<CallToolResult, McpError> {
        let filter = match p.unit_type.as_deref() {
            Some(s) => Some(UnitType::from_str(s).ok_or_else(|| {
                McpError::invalid_params(format!("Unknown unit type '{}'. Use mass, volume or count.", s), None)
            })?),
            None => None,
        };

        let units: Vec<_> = self
            .table
            .definitions()
            .filter(|d| filter.map_or(true, |t| d.unit_type == t))
            .collect();
        to_json(&units)
    }

    #[tool(description = "Convert a quantity between units. Volume <-> weight conversions need the ingredient name (e.g. 1 cup flour -> 120 g).")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .converter()
            .convert(p.quantity, &p.from_unit, &p.to_unit, p.ingredient.as_deref())
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let display = common_fraction(result).unwrap_or_else(|| format!("{:.2}", result));
        to_json(&ConvertUnitsResponse {
            quantity: p.quantity,
            from_unit: p.from_unit,
            to_unit: p.to_unit,
            result,
            display,
        })
    }

    #[tool(description = "Re-express a quantity in a measurement system (metric, imperial, us_customary), picking a readable unit and rounding for display")]
    fn display_quantity(&self, Parameters(p): Parameters<DisplayQuantityParams>) -> Result<CallToolResult, McpError> {
        let system = MeasurementSystem::from_str(&p.system).ok_or_else(|| {
            McpError::invalid_params(
                format!("Unknown measurement system '{}'. Use metric, imperial, us_customary or universal.", p.system),
                None,
            )
        })?;

        let (quantity, unit) =
            self.converter()
                .format_for_display(p.quantity, &p.unit, system, p.ingredient.as_deref());
        to_json(&DisplayQuantityResponse { quantity, unit })
    }

    // --- Recipes ---

    #[tool(description = "Scale a recipe to a new number of servings. Numeric quantities and ranges like \"4-6\" are scaled; text such as \"to taste\" is kept as-is.")]
    fn scale_recipe(&self, Parameters(p): Parameters<ScaleRecipeParams>) -> Result<CallToolResult, McpError> {
        let recipe = Recipe::from(p.recipe);
        let scaled = scale_recipe(&recipe, p.target_servings)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let ingredients_text = scaled.format_ingredients_text();
        let summary = serde_json::json!({
            "recipe": scaled,
            "ingredients_text": ingredients_text,
        });
        to_json(&summary)
    }

    // --- Shopping List ---

    #[tool(description = "Build a consolidated shopping list from several recipes. Amounts of the same ingredient are combined across units where possible and grouped by store section.")]
    fn generate_shopping_list(&self, Parameters(p): Parameters<GenerateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let recipes: Vec<Recipe> = p.recipes.into_iter().map(Recipe::from).collect();
        let aggregator = ShoppingListAggregator::with_settings(&self.table, (*self.settings).clone());

        let list = aggregator.aggregate(&recipes);
        tracing::info!(
            "Generated shopping list: {} items from {} recipes",
            list.len(),
            recipes.len()
        );

        to_json(&ShoppingListResponse {
            recipe_count: recipes.len(),
            item_count: list.len(),
            categories: list
                .in_display_order()
                .into_iter()
                .map(|(category, items)| CategoryGroup { category, items })
                .collect(),
            text: aggregator.format_text(&list),
        })
    }

    #[tool(description = "Get the store section (Produce, Meat, Dairy, Seasonings, Baking, Pantry, Uncategorized) an ingredient name falls under")]
    fn categorize_ingredient(&self, Parameters(p): Parameters<CategorizeIngredientParams>) -> Result<CallToolResult, McpError> {
        let category = categorize_ingredient(&p.name);
        to_json(&serde_json::json!({ "name": p.name, "category": category.as_str() }))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for KitchenService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "kitchen-measure".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Kitchen Measure".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Kitchen Measure - cooking unit conversion, recipe scaling and shopping lists. \
                 Units: list_units, convert_units (pass ingredient for cup <-> gram), display_quantity. \
                 Recipes: scale_recipe. \
                 Shopping: generate_shopping_list (combines amounts across recipes), categorize_ingredient."
                    .into(),
            ),
        }
    }
}
