//! AWS Athena implementation of [`QueryService`].
//!
//! Each trait method maps onto one Athena API call: `StartQueryExecution`,
//! `GetQueryExecution`, `GetQueryResults` and `StopQueryExecution`. Polling
//! and result shaping live in [`QueryExecutor`](crate::QueryExecutor).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::operation::get_query_results::GetQueryResultsOutput;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use tracing::{debug, info};

use crate::config::AthenaConfig;
use crate::service::{AthenaError, ExecutionStatus, QueryService, ResultPage, StatusReport};

/// Athena caps `GetQueryResults.MaxResults` at 1000.
const MAX_RESULTS_PER_CALL: usize = 1000;

/// Client for running queries on AWS Athena.
pub struct AthenaClient {
    athena_client: aws_sdk_athena::Client,
}

impl AthenaClient {
    /// Create a new [`AthenaClient`] for the region in `config`.
    ///
    /// Credentials are resolved by the default AWS provider chain.
    pub async fn new(config: &AthenaConfig) -> Self {
        let region = aws_sdk_athena::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        info!(region = %config.region, "AthenaClient initialised");

        Self {
            athena_client: aws_sdk_athena::Client::new(&aws_cfg),
        }
    }
}

#[async_trait]
impl QueryService for AthenaClient {
    async fn submit(
        &self,
        query: &str,
        database: &str,
        output_location: &str,
        workgroup: Option<&str>,
    ) -> Result<String, AthenaError> {
        let resp = self
            .athena_client
            .start_query_execution()
            .query_string(query)
            .query_execution_context(QueryExecutionContext::builder().database(database).build())
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .set_work_group(workgroup.map(str::to_string))
            .send()
            .await
            .map_err(|e| AthenaError::Submission(DisplayErrorContext(&e).to_string()))?;

        let query_id = resp
            .query_execution_id()
            .ok_or(AthenaError::MissingField("QueryExecutionId"))?
            .to_string();

        info!(query_id = %query_id, database = %database, "Query execution started");
        Ok(query_id)
    }

    async fn get_status(&self, execution_id: &str) -> Result<StatusReport, AthenaError> {
        let resp = self
            .athena_client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| AthenaError::Service(DisplayErrorContext(&e).to_string()))?;

        let status = resp
            .query_execution()
            .ok_or(AthenaError::MissingField("QueryExecution"))?
            .status();

        Ok(StatusReport {
            state: map_state(status.and_then(|s| s.state())),
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
        })
    }

    async fn get_results(
        &self,
        execution_id: &str,
        max_rows: usize,
    ) -> Result<ResultPage, AthenaError> {
        let max_results = max_rows.clamp(1, MAX_RESULTS_PER_CALL) as i32;

        let output = self
            .athena_client
            .get_query_results()
            .query_execution_id(execution_id)
            .max_results(max_results)
            .send()
            .await
            .map_err(|e| AthenaError::Service(DisplayErrorContext(&e).to_string()))?;

        let page = parse_results(&output)?;
        debug!(
            query_id = %execution_id,
            columns = page.column_labels.len(),
            rows = page.rows.len(),
            "Fetched Athena results"
        );
        Ok(page)
    }

    async fn cancel(&self, execution_id: &str) -> Result<(), AthenaError> {
        info!(query_id = %execution_id, "Cancelling query");

        self.athena_client
            .stop_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| AthenaError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Map the SDK state onto [`ExecutionStatus`].
///
/// A missing or unrecognised state is treated as still queued so the poll
/// loop keeps waiting rather than declaring a verdict it never saw.
fn map_state(state: Option<&QueryExecutionState>) -> ExecutionStatus {
    match state {
        Some(QueryExecutionState::Succeeded) => ExecutionStatus::Succeeded,
        Some(QueryExecutionState::Failed) => ExecutionStatus::Failed,
        Some(QueryExecutionState::Cancelled) => ExecutionStatus::Cancelled,
        Some(QueryExecutionState::Running) => ExecutionStatus::Running,
        _ => ExecutionStatus::Queued,
    }
}

/// Flatten `GetQueryResults` into a [`ResultPage`].
///
/// Column labels come from `ResultSetMetadata.ColumnInfo`, preferring `Label`
/// over `Name`. Rows are passed through untouched, header echo included.
fn parse_results(output: &GetQueryResultsOutput) -> Result<ResultPage, AthenaError> {
    let result_set = output
        .result_set()
        .ok_or_else(|| AthenaError::Parse("No ResultSet in response".into()))?;

    let column_labels = result_set
        .result_set_metadata()
        .map(|meta| {
            meta.column_info()
                .iter()
                .map(|ci| ci.label().unwrap_or(ci.name()).to_string())
                .collect()
        })
        .unwrap_or_default();

    let rows = result_set
        .rows()
        .iter()
        .map(|row| {
            row.data()
                .iter()
                .map(|datum| datum.var_char_value().map(str::to_string))
                .collect()
        })
        .collect();

    Ok(ResultPage {
        column_labels,
        rows,
    })
}
