//! Scripted in-memory [`QueryService`] for tests and offline runs.
//!
//! Every execution stays RUNNING for a fixed span of tokio time after
//! submission, then reports the scripted terminal status. Works with
//! `#[tokio::test(start_paused = true)]` since it reads the tokio clock.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::service::{AthenaError, ExecutionStatus, QueryService, ResultPage, StatusReport};

/// Arguments of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub query: String,
    pub database: String,
    pub output_location: String,
    pub workgroup: Option<String>,
}

#[derive(Debug, Default)]
struct Recorded {
    submissions: Vec<(Submission, Instant)>,
    status_polls: usize,
    fetches: Vec<usize>,
    cancelled: Vec<String>,
}

pub struct ScriptedQueryService {
    run_time: Duration,
    outcome: StatusReport,
    page: ResultPage,
    submit_error: Option<String>,
    fetch_error: Option<String>,
    cancel_error: Option<String>,
    recorded: Mutex<Recorded>,
}

impl ScriptedQueryService {
    /// Succeeds immediately and returns `page` verbatim.
    pub fn succeeding(page: ResultPage) -> Self {
        Self {
            run_time: Duration::ZERO,
            outcome: StatusReport::new(ExecutionStatus::Succeeded),
            page,
            submit_error: None,
            fetch_error: None,
            cancel_error: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Finishes in `state` (FAILED or CANCELLED) with `reason`.
    pub fn ending(state: ExecutionStatus, reason: impl Into<String>) -> Self {
        Self {
            outcome: StatusReport::with_reason(state, reason),
            ..Self::succeeding(ResultPage::default())
        }
    }

    /// Refuses every submission with `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            submit_error: Some(message.into()),
            ..Self::succeeding(ResultPage::default())
        }
    }

    /// Stay RUNNING for `run_time` before reporting the outcome.
    pub fn running_for(mut self, run_time: Duration) -> Self {
        self.run_time = run_time;
        self
    }

    /// Fail the results fetch with `message`.
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    /// Refuse stop requests with `message`; the execution keeps running.
    pub fn failing_cancel(mut self, message: impl Into<String>) -> Self {
        self.cancel_error = Some(message.into());
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn status_polls(&self) -> usize {
        self.lock().status_polls
    }

    /// `max_rows` of every results fetch, in call order.
    pub fn fetches(&self) -> Vec<usize> {
        self.lock().fetches.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.lock().cancelled.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn submitted_at(&self, execution_id: &str) -> Result<Instant, AthenaError> {
        execution_id
            .strip_prefix("exec-")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| self.lock().submissions.get(n).map(|(_, at)| *at))
            .ok_or_else(|| AthenaError::Service(format!("unknown execution {execution_id}")))
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn submit(
        &self,
        query: &str,
        database: &str,
        output_location: &str,
        workgroup: Option<&str>,
    ) -> Result<String, AthenaError> {
        if let Some(message) = &self.submit_error {
            return Err(AthenaError::Submission(message.clone()));
        }

        let mut recorded = self.lock();
        let execution_id = format!("exec-{}", recorded.submissions.len());
        recorded.submissions.push((
            Submission {
                query: query.to_string(),
                database: database.to_string(),
                output_location: output_location.to_string(),
                workgroup: workgroup.map(str::to_string),
            },
            Instant::now(),
        ));
        Ok(execution_id)
    }

    async fn get_status(&self, execution_id: &str) -> Result<StatusReport, AthenaError> {
        let submitted_at = self.submitted_at(execution_id)?;
        self.lock().status_polls += 1;

        if self.lock().cancelled.iter().any(|id| id == execution_id) {
            return Ok(StatusReport::with_reason(
                ExecutionStatus::Cancelled,
                "Query cancelled by user",
            ));
        }
        if submitted_at.elapsed() < self.run_time {
            return Ok(StatusReport::new(ExecutionStatus::Running));
        }
        Ok(self.outcome.clone())
    }

    async fn get_results(
        &self,
        execution_id: &str,
        max_rows: usize,
    ) -> Result<ResultPage, AthenaError> {
        self.submitted_at(execution_id)?;
        self.lock().fetches.push(max_rows);

        if let Some(message) = &self.fetch_error {
            return Err(AthenaError::Service(message.clone()));
        }
        Ok(ResultPage {
            column_labels: self.page.column_labels.clone(),
            rows: self.page.rows.iter().take(max_rows).cloned().collect(),
        })
    }

    async fn cancel(&self, execution_id: &str) -> Result<(), AthenaError> {
        self.submitted_at(execution_id)?;
        if let Some(message) = &self.cancel_error {
            return Err(AthenaError::Service(message.clone()));
        }
        self.lock().cancelled.push(execution_id.to_string());
        Ok(())
    }
}
