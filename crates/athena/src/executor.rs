//! Submit, poll, fetch and reshape.
//!
//! [`QueryExecutor`] drives one query through a [`QueryService`] and always
//! hands back a [`QueryResult`]: service errors are folded into
//! `success: false` results at this boundary and never escape to callers.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::AthenaConfig;
use crate::result::{QueryResult, Row};
use crate::service::{AthenaError, ExecutionStatus, QueryService, ResultPage, StatusReport};

/// Maximum rows requested from the service per query, header row included.
pub const ROW_CAP: usize = 100;

/// Runs queries against a configured database and output location.
///
/// Stateless across calls; clone the `Arc` service freely.
pub struct QueryExecutor {
    service: Arc<dyn QueryService>,
    database: String,
    output_location: String,
    workgroup: Option<String>,
    max_wait: Duration,
    poll_interval: Duration,
    cancel_on_timeout: bool,
}

impl QueryExecutor {
    pub fn new(service: Arc<dyn QueryService>, config: &AthenaConfig) -> Self {
        Self {
            service,
            database: config.database.clone(),
            output_location: config.output_location.clone(),
            workgroup: config.workgroup.clone(),
            max_wait: config.max_wait(),
            poll_interval: config.poll_interval(),
            cancel_on_timeout: config.cancel_on_timeout,
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Execute `query`, waiting at most the configured default.
    pub async fn execute(&self, query: &str) -> QueryResult {
        self.run(query, self.max_wait).await
    }

    /// Execute `query`, waiting at most `max_wait_seconds` for a terminal state.
    ///
    /// If the wait runs out first, the last observed status is reported as the
    /// failure. The remote execution is not stopped unless `cancel_on_timeout`
    /// is configured.
    pub async fn execute_with_timeout(&self, query: &str, max_wait_seconds: u64) -> QueryResult {
        self.run(query, Duration::from_secs(max_wait_seconds)).await
    }

    async fn run(&self, query: &str, max_wait: Duration) -> QueryResult {
        match self.try_run(query, max_wait).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Query execution error");
                QueryResult::failed(query, e.to_string())
            }
        }
    }

    async fn try_run(&self, query: &str, max_wait: Duration) -> Result<QueryResult, AthenaError> {
        info!(sql = %query, database = %self.database, "Starting query");

        let query_id = self
            .service
            .submit(
                query,
                &self.database,
                &self.output_location,
                self.workgroup.as_deref(),
            )
            .await?;

        let status = self.poll(&query_id, max_wait).await?;

        if status.state != ExecutionStatus::Succeeded {
            let reason = status.reason.as_deref().unwrap_or("Unknown error");
            return Ok(QueryResult::failed(
                query,
                format!("Query {}: {}", status.state.as_str().to_lowercase(), reason),
            ));
        }

        let page = self.service.get_results(&query_id, ROW_CAP).await?;
        let (columns, rows) = shape_rows(page);

        info!(query_id = %query_id, rows = rows.len(), "Query succeeded");
        Ok(QueryResult::succeeded(query, columns, rows))
    }

    /// Poll at a fixed interval until a terminal state or until `max_wait`
    /// has elapsed, returning the last status seen.
    async fn poll(&self, query_id: &str, max_wait: Duration) -> Result<StatusReport, AthenaError> {
        let start = Instant::now();

        loop {
            let status = self.service.get_status(query_id).await?;

            debug!(
                query_id = %query_id,
                state = %status.state,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Polling query status"
            );

            if status.state.is_terminal() {
                return Ok(status);
            }

            tokio::time::sleep(self.poll_interval).await;

            if start.elapsed() >= max_wait {
                warn!(
                    query_id = %query_id,
                    state = %status.state,
                    max_wait_seconds = max_wait.as_secs(),
                    "Stopped waiting; execution may continue server-side"
                );
                if self.cancel_on_timeout {
                    if let Err(e) = self.service.cancel(query_id).await {
                        warn!(query_id = %query_id, error = %e, "Cancel request failed");
                    }
                }
                return Ok(status);
            }
        }
    }
}

/// Drop the header echo, cap the row count and zip each row with the column
/// labels. Missing or NULL cells become empty strings.
fn shape_rows(page: ResultPage) -> (Vec<String>, Vec<Row>) {
    let ResultPage {
        column_labels,
        rows,
    } = page;

    let shaped = rows
        .into_iter()
        .skip(1)
        .take(ROW_CAP)
        .map(|cells| {
            let mut cells = cells.into_iter();
            column_labels
                .iter()
                .map(|name| (name.clone(), cells.next().flatten().unwrap_or_default()))
                .collect::<Row>()
        })
        .collect();

    (column_labels, shaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn header_row_is_dropped() {
        let page = ResultPage {
            column_labels: vec!["borough".into(), "trips".into()],
            rows: vec![
                cells(&[Some("borough"), Some("trips")]),
                cells(&[Some("Queens"), Some("42")]),
            ],
        };
        let (columns, rows) = shape_rows(page);
        assert_eq!(columns, vec!["borough", "trips"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["borough"], "Queens");
        assert_eq!(rows[0]["trips"], "42");
    }

    #[test]
    fn null_and_missing_cells_become_empty() {
        let page = ResultPage {
            column_labels: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![
                cells(&[Some("a"), Some("b"), Some("c")]),
                cells(&[Some("1"), None]),
            ],
        };
        let (_, rows) = shape_rows(page);
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn column_names_come_from_metadata_not_header() {
        let page = ResultPage {
            column_labels: vec!["tab_name".into()],
            rows: vec![cells(&[Some("something else")]), cells(&[Some("taxi_zones")])],
        };
        let (columns, rows) = shape_rows(page);
        assert_eq!(columns, vec!["tab_name"]);
        assert_eq!(rows[0]["tab_name"], "taxi_zones");
    }

    #[test]
    fn rows_are_capped() {
        let rows = (0..=ROW_CAP + 20)
            .map(|i| vec![Some(i.to_string())])
            .collect();
        let page = ResultPage {
            column_labels: vec!["n".into()],
            rows,
        };
        let (_, rows) = shape_rows(page);
        assert_eq!(rows.len(), ROW_CAP);
        assert_eq!(rows[0]["n"], "1");
    }

    #[test]
    fn empty_page_yields_no_rows() {
        let (columns, rows) = shape_rows(ResultPage::default());
        assert!(columns.is_empty());
        assert!(rows.is_empty());
    }
}
