//! The remote execution service boundary.
//!
//! [`QueryService`] is the seam between the [`QueryExecutor`](crate::QueryExecutor)
//! and whatever actually runs SQL: [`AthenaClient`](crate::AthenaClient) in
//! production, [`ScriptedQueryService`](crate::ScriptedQueryService) in tests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the execution service.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// The service refused the query (malformed SQL, permission denied, ...).
    #[error("{0}")]
    Submission(String),

    /// A status or result call against an existing execution failed.
    #[error("AWS SDK error: {0}")]
    Service(String),

    /// The service response lacked a field every response should carry.
    #[error("Missing {0} in response")]
    MissingField(&'static str),

    /// Failed to parse result data.
    #[error("Parse error: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of one query execution, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    /// SUCCEEDED, FAILED and CANCELLED never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of an execution's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub state: ExecutionStatus,
    /// Service-provided explanation, usually only present on FAILED/CANCELLED.
    pub reason: Option<String>,
}

impl StatusReport {
    pub fn new(state: ExecutionStatus) -> Self {
        Self { state, reason: None }
    }

    pub fn with_reason(state: ExecutionStatus, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: Some(reason.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One page of raw results.
///
/// `rows` is exactly what the service returned, so for SELECT-style queries
/// the first entry echoes the column labels. `None` cells are SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub column_labels: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Asynchronous SQL execution service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Start an execution and return its identifier.
    async fn submit(
        &self,
        query: &str,
        database: &str,
        output_location: &str,
        workgroup: Option<&str>,
    ) -> Result<String, AthenaError>;

    /// Observe the current state of an execution.
    async fn get_status(&self, execution_id: &str) -> Result<StatusReport, AthenaError>;

    /// Fetch up to `max_rows` rows (header row included) of a finished execution.
    async fn get_results(
        &self,
        execution_id: &str,
        max_rows: usize,
    ) -> Result<ResultPage, AthenaError>;

    /// Ask the service to stop an execution.
    async fn cancel(&self, execution_id: &str) -> Result<(), AthenaError>;
}
