//! `get_schema`: table names, descriptions and columns.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tlc_athena::SchemaCatalog;

use crate::tool::{Tool, ToolDefinition, ToolError, ToolResult};

pub struct GetSchemaTool {
    catalog: Arc<SchemaCatalog>,
}

impl GetSchemaTool {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for GetSchemaTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_schema".to_string(),
            description: "Get the schema information for all NYC TLC tables in the Athena database. \
                          Returns table names, descriptions, and column lists."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::text(self.catalog.describe()))
    }
}
