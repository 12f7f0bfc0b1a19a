//! The NYC TLC tools exposed to the assistant.
//!
//! - `query_tlc_data`: runs SQL through the [`QueryExecutor`], or hands
//!   natural-language input back with the schema so the assistant writes SQL
//! - `get_schema`: the table catalog as text
//! - `generate_sql`: the catalog plus a prompt to write SQL; never executes

pub mod query_tlc_data;
pub mod get_schema;
pub mod generate_sql;

use std::sync::Arc;

use tlc_athena::{QueryExecutor, SchemaCatalog};

use crate::classify::QueryClassifier;
use crate::registry::{RegistryError, ToolRegistry};

pub use generate_sql::GenerateSqlTool;
pub use get_schema::GetSchemaTool;
pub use query_tlc_data::QueryTlcDataTool;

/// Register all three TLC tools, in listing order.
pub fn register_tlc_tools(
    registry: &mut ToolRegistry,
    executor: Arc<QueryExecutor>,
    catalog: Arc<SchemaCatalog>,
    classifier: Arc<dyn QueryClassifier>,
) -> Result<(), RegistryError> {
    registry.register(QueryTlcDataTool::new(executor, catalog.clone(), classifier))?;
    registry.register(GetSchemaTool::new(catalog.clone()))?;
    registry.register(GenerateSqlTool::new(catalog))?;
    Ok(())
}
