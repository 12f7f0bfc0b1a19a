//! `query_tlc_data`: execute SQL against the TLC tables.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use tlc_athena::{QueryExecutor, QueryResult, SchemaCatalog, ROW_CAP};

use crate::classify::QueryClassifier;
use crate::tool::{required_str, Tool, ToolDefinition, ToolError, ToolResult};

pub struct QueryTlcDataTool {
    executor: Arc<QueryExecutor>,
    catalog: Arc<SchemaCatalog>,
    classifier: Arc<dyn QueryClassifier>,
}

impl QueryTlcDataTool {
    pub fn new(
        executor: Arc<QueryExecutor>,
        catalog: Arc<SchemaCatalog>,
        classifier: Arc<dyn QueryClassifier>,
    ) -> Self {
        Self {
            executor,
            catalog,
            classifier,
        }
    }

    fn guidance(&self, question: &str) -> String {
        format!(
            "Natural language query detected: '{question}'\n\n\
             Please generate SQL based on this question and the schema below:\n\n\
             {}\n\n\
             Then call query_tlc_data again with the generated SQL.",
            self.catalog.describe()
        )
    }
}

/// Render an executor result as the text the assistant reads.
pub fn format_result(result: &QueryResult) -> Result<String, ToolError> {
    let mut out = String::new();
    if result.success {
        let _ = write!(
            out,
            "Query executed successfully!\n\nSQL: {}\n\nReturned {} rows\n\n",
            result.query, result.row_count
        );
        if result.row_count > 0 {
            let rows = serde_json::to_string_pretty(&result.rows).map_err(|e| {
                ToolError::ExecutionFailed(format!("JSON serialization failed: {e}"))
            })?;
            out.push_str("Results:\n");
            out.push_str(&rows);
        } else {
            out.push_str("No results returned.");
        }
    } else {
        let _ = write!(
            out,
            "Query failed!\n\nSQL: {}\n\nError: {}",
            result.query,
            result.error.as_deref().unwrap_or("Unknown error")
        );
    }
    Ok(out)
}

#[async_trait]
impl Tool for QueryTlcDataTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "query_tlc_data".to_string(),
            description: format!(
                "Execute a SQL query against NYC TLC data in Athena. \
                 Accepts natural language questions or direct SQL queries. \
                 The tool will help convert natural language to SQL if needed. \
                 Available tables: {}. \
                 Returns up to {ROW_CAP} rows of results.",
                self.catalog.table_names().join(", ")
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Either a SQL query or a natural language question about the TLC data"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let query = required_str(&input, "query")?;

        if !self.classifier.is_sql(query) {
            debug!(query = %query, "Natural language input, returning schema guidance");
            return Ok(ToolResult::text(self.guidance(query)));
        }

        let result = self.executor.execute(query).await;
        info!(
            success = result.success,
            rows = result.row_count,
            "query_tlc_data finished"
        );

        let text = format_result(&result)?;
        Ok(if result.success {
            ToolResult::text(text)
        } else {
            ToolResult::error(text)
        })
    }
}
