use crate::types::error_codes;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Tool name absent from the registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A tool returned `Err`; reported inside a `CallToolResult`.
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl McpError {
    /// JSON-RPC code sent when this error becomes an error response.
    pub fn code(&self) -> i64 {
        match self {
            McpError::JsonParse(_) => error_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) | McpError::ToolNotFound(_) => error_codes::INVALID_PARAMS,
            McpError::Transport(_) | McpError::ToolExecution(_) | McpError::Serialize(_) => {
                error_codes::INTERNAL_ERROR
            }
        }
    }
}
