//! `generate_sql`: forward a question plus the schema to the assistant.
//!
//! SQL writing is the assistant's job; this tool only supplies context.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tlc_athena::SchemaCatalog;

use crate::tool::{required_str, Tool, ToolDefinition, ToolError, ToolResult};

pub struct GenerateSqlTool {
    catalog: Arc<SchemaCatalog>,
}

impl GenerateSqlTool {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for GenerateSqlTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "generate_sql".to_string(),
            description: "Generate a SQL query from a natural language question about NYC TLC data. \
                          Returns the SQL without executing it, allowing you to review before running."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "Natural language question about the TLC data"
                    }
                },
                "required": ["question"]
            }),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let question = required_str(&input, "question")?;
        Ok(ToolResult::text(format!(
            "Question: {question}\n\n{}\n\nGenerate appropriate SQL for this question.",
            self.catalog.describe()
        )))
    }
}
