//! Kitchen Measure
//!
//! An MCP server for kitchen unit conversion, recipe scaling and shopping lists.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use kitchen_measure::mcp::KitchenService;
use kitchen_measure::{ConsolidationSettings, UnitTable};

/// Substitute unit table (JSON), replacing the built-in one
const UNITS_PATH_VAR: &str = "KITCHEN_MEASURE_UNITS";
/// Consolidation settings (JSON)
const SETTINGS_PATH_VAR: &str = "KITCHEN_MEASURE_SETTINGS";

fn load_unit_table() -> Result<UnitTable, Box<dyn std::error::Error>> {
    match std::env::var(UNITS_PATH_VAR) {
        Ok(path) => {
            eprintln!("Unit table: {}", path);
            Ok(UnitTable::from_file(&path)?)
        }
        Err(_) => {
            eprintln!("Unit table: built-in");
            Ok(UnitTable::standard())
        }
    }
}

fn load_settings() -> Result<ConsolidationSettings, Box<dyn std::error::Error>> {
    match std::env::var(SETTINGS_PATH_VAR) {
        Ok(path) => {
            eprintln!("Settings: {}", path);
            Ok(ConsolidationSettings::from_file(&path)?)
        }
        Err(_) => Ok(ConsolidationSettings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kitchen_measure=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    eprintln!("Kitchen Measure v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Starting MCP server on stdio...");

    let table = load_unit_table()?;
    let settings = load_settings()?;
    tracing::info!("Loaded {} units", table.definitions().count());

    let service = KitchenService::new(table, settings);

    // Create stdio transport
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
