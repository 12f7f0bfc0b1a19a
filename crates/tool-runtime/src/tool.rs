use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Describes a tool's interface for assistant consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "query_tlc_data", "get_schema")
    pub name: String,
    /// Human-readable description for the assistant
    pub description: String,
    /// JSON Schema describing the expected input
    pub input_schema: Value,
}

/// Result of executing a tool, sent back to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Result content as text
    pub content: String,
    /// Whether this result represents an error
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// The primary extension point: all tools implement this trait.
///
/// Tools are object-safe, Send + Sync, and async.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.description)
    }
}

/// Read a required string argument from a tool input object.
pub fn required_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidInput(format!("missing '{field}' field")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_display() {
        let def = ToolDefinition {
            name: "get_schema".to_string(),
            description: "Schema listing".to_string(),
            input_schema: serde_json::json!({"type": "object"}),
        };
        assert_eq!(def.to_string(), "get_schema(Schema listing)");
    }

    #[test]
    fn test_tool_result_constructors() {
        assert!(!ToolResult::text("ok").is_error);
        let err = ToolResult::error("bad");
        assert!(err.is_error);
        assert_eq!(err.content, "bad");
    }

    #[test]
    fn test_required_str() {
        let input = serde_json::json!({"query": "SELECT 1", "limit": 5});
        assert_eq!(required_str(&input, "query").unwrap(), "SELECT 1");

        let err = required_str(&input, "limit").unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input: missing 'limit' field");

        assert!(required_str(&serde_json::Value::Null, "query").is_err());
    }
}
