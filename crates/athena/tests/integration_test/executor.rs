//! QueryExecutor end-to-end against the scripted service.

use std::sync::Arc;
use std::time::Duration;

use tlc_athena::*;

fn config() -> AthenaConfig {
    AthenaConfig {
        database: "nyc_tlc".into(),
        output_location: "s3://tlc-results/athena/".into(),
        ..AthenaConfig::default()
    }
}

fn executor(service: &Arc<ScriptedQueryService>) -> QueryExecutor {
    QueryExecutor::new(service.clone(), &config())
}

fn page(labels: &[&str], rows: &[&[&str]]) -> ResultPage {
    ResultPage {
        column_labels: labels.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect(),
    }
}

#[tokio::test(start_paused = true)]
async fn show_tables_returns_data_rows_without_header() {
    let service = Arc::new(ScriptedQueryService::succeeding(page(
        &["tab_name"],
        &[&["tab_name"], &["gtp_tlc_data"], &["taxi_zones"]],
    )));

    let result = executor(&service).execute("SHOW TABLES IN nyc_tlc").await;

    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.columns, vec!["tab_name"]);
    assert_eq!(result.row_count, 2);
    assert_eq!(result.rows[0]["tab_name"], "gtp_tlc_data");
    assert_eq!(result.rows[1]["tab_name"], "taxi_zones");
    assert!(result.rows.iter().all(|r| r["tab_name"] != "tab_name"));
    assert_eq!(result.query, "SHOW TABLES IN nyc_tlc");

    let submissions = service.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].database, "nyc_tlc");
    assert_eq!(submissions[0].output_location, "s3://tlc-results/athena/");
    assert_eq!(service.fetches(), vec![ROW_CAP]);
}

#[tokio::test(start_paused = true)]
async fn failed_query_reports_status_and_reason() {
    let service = Arc::new(ScriptedQueryService::ending(
        ExecutionStatus::Failed,
        "TABLE_NOT_FOUND",
    ));

    let result = executor(&service)
        .execute("SELECT * FROM nonexistent_table")
        .await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Query failed: TABLE_NOT_FOUND"));
    assert_eq!(result.query, "SELECT * FROM nonexistent_table");
    assert!(service.fetches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_query_names_cancelled() {
    let service = Arc::new(
        ScriptedQueryService::ending(ExecutionStatus::Cancelled, "Stopped by operator")
            .running_for(Duration::from_secs(3)),
    );

    let result = executor(&service).execute("SELECT count(*) FROM gtp_tlc_data").await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("cancelled"));
    assert!(error.contains("Stopped by operator"));
    assert_eq!(service.status_polls(), 4);
}

#[tokio::test(start_paused = true)]
async fn local_timeout_reports_last_running_status() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(page(&["n"], &[&["n"], &["1"]]))
            .running_for(Duration::from_secs(5)),
    );

    let started = tokio::time::Instant::now();
    let result = executor(&service)
        .execute_with_timeout("SELECT count(*) AS n FROM gtp_tlc_data", 1)
        .await;
    let waited = started.elapsed();

    assert!(waited >= Duration::from_secs(1));
    assert!(waited < Duration::from_secs(2));
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Query running: Unknown error"));
    assert_eq!(service.status_polls(), 1);
    // Local give-up leaves the remote execution alone by default.
    assert!(service.cancelled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_poll_interval_sets_poll_cadence() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(page(&["n"], &[&["n"], &["42"]]))
            .running_for(Duration::from_millis(1100)),
    );
    let cfg = AthenaConfig {
        poll_interval_ms: 250,
        ..config()
    };

    let started = tokio::time::Instant::now();
    let result = QueryExecutor::new(service.clone(), &cfg)
        .execute("SELECT count(*) AS n FROM taxi_zones")
        .await;
    let waited = started.elapsed();

    assert!(result.success);
    assert_eq!(result.rows[0]["n"], "42");
    // RUNNING at 0, 250, 500, 750 and 1000 ms; SUCCEEDED at 1250 ms.
    assert_eq!(service.status_polls(), 6);
    assert!(waited >= Duration::from_millis(1250));
    assert!(waited < Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn custom_poll_interval_bounds_polls_before_timeout() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(ResultPage::default())
            .running_for(Duration::from_secs(30)),
    );
    let cfg = AthenaConfig {
        poll_interval_ms: 250,
        ..config()
    };

    let result = QueryExecutor::new(service.clone(), &cfg)
        .execute_with_timeout("SELECT * FROM gtp_tlc_data", 1)
        .await;

    assert_eq!(result.error.as_deref(), Some("Query running: Unknown error"));
    assert_eq!(service.status_polls(), 4);
}

#[tokio::test(start_paused = true)]
async fn failed_cancel_leaves_timeout_result_unchanged() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(ResultPage::default())
            .running_for(Duration::from_secs(30))
            .failing_cancel("AccessDeniedException: not allowed to stop queries"),
    );
    let cfg = AthenaConfig {
        cancel_on_timeout: true,
        ..config()
    };

    let result = QueryExecutor::new(service.clone(), &cfg)
        .execute_with_timeout("SELECT * FROM gtp_tlc_data", 2)
        .await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Query running: Unknown error"));
    assert!(result.rows.is_empty());
    assert!(service.cancelled().is_empty());
    assert!(service.fetches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_on_timeout_sends_stop_request() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(ResultPage::default())
            .running_for(Duration::from_secs(30)),
    );
    let cfg = AthenaConfig {
        cancel_on_timeout: true,
        ..config()
    };

    let result = QueryExecutor::new(service.clone(), &cfg)
        .execute_with_timeout("SELECT * FROM gtp_tlc_data", 2)
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("Query running"));
    assert_eq!(service.cancelled(), vec!["exec-0".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn submission_error_becomes_failed_result() {
    let service = Arc::new(ScriptedQueryService::rejecting(
        "AccessDeniedException: not authorized to perform athena:StartQueryExecution",
    ));

    let result = executor(&service).execute("SELECT 1").await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("AccessDeniedException"));
    assert_eq!(result.query, "SELECT 1");
    assert_eq!(service.status_polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn fetch_error_becomes_failed_result() {
    let service = Arc::new(
        ScriptedQueryService::succeeding(page(&["n"], &[&["n"], &["1"]]))
            .failing_fetch("ThrottlingException"),
    );

    let result = executor(&service).execute("SELECT 1 AS n").await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("ThrottlingException"));
}

#[tokio::test(start_paused = true)]
async fn large_results_are_capped() {
    let mut rows: Vec<Vec<&str>> = vec![vec!["locationid"]];
    let ids: Vec<String> = (1..=265).map(|i| i.to_string()).collect();
    rows.extend(ids.iter().map(|id| vec![id.as_str()]));
    let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();

    let service = Arc::new(ScriptedQueryService::succeeding(page(
        &["locationid"],
        &row_refs,
    )));

    let result = executor(&service)
        .execute("SELECT locationid FROM taxi_zones")
        .await;

    assert!(result.success);
    assert!(result.rows.len() <= ROW_CAP);
    assert_eq!(result.row_count, result.rows.len());
    assert_eq!(result.rows[0]["locationid"], "1");
}

#[tokio::test(start_paused = true)]
async fn repeated_execution_is_stable() {
    let service = Arc::new(ScriptedQueryService::succeeding(page(
        &["borough", "zones"],
        &[&["borough", "zones"], &["Queens", "69"], &["Brooklyn", "61"]],
    )));
    let exec = executor(&service);
    let query = "SELECT borough, count(*) AS zones FROM taxi_zones GROUP BY 1";

    let first = exec.execute(query).await;
    let second = exec.execute(query).await;

    assert_eq!(first.columns, second.columns);
    assert_eq!(first.row_count, second.row_count);
    assert_eq!(first, second);
    assert_eq!(service.submissions().len(), 2);
}
