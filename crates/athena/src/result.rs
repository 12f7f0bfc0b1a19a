use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data row, keyed by column name in result-set order.
pub type Row = IndexMap<String, String>;

/// Outcome of one query, shaped for JSON consumers.
///
/// Built only through [`QueryResult::succeeded`] and [`QueryResult::failed`],
/// which keep `row_count == rows.len()` and leave `error` empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub row_count: usize,
    /// The query text exactly as submitted.
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    pub fn succeeded(query: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            success: true,
            columns,
            row_count: rows.len(),
            rows,
            query: query.into(),
            error: None,
        }
    }

    pub fn failed(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            query: query.into(),
            error: Some(error.into()),
        }
    }
}
