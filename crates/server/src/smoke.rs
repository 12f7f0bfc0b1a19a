//! Manual end-to-end check against a live Athena setup.

use std::io::Write;

use tracing::{info, warn};

use tlc_athena::{AthenaConfig, QueryExecutor, QueryResult, SchemaCatalog};

/// Wait bound for the `SHOW TABLES` connectivity check.
const SHOW_TABLES_WAIT_SECS: u64 = 30;

/// Outcome of a smoke-test run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub passed: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl SmokeReport {
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, step: &'static str, ok: bool) {
        if ok {
            self.passed.push(step);
        } else {
            self.failed.push(step);
        }
    }
}

/// Run every step, printing progress to `out`.
pub async fn run<W: Write>(
    config: &AthenaConfig,
    catalog: &SchemaCatalog,
    executor: &QueryExecutor,
    out: &mut W,
) -> std::io::Result<SmokeReport> {
    let mut report = SmokeReport::default();

    writeln!(out, "== Configuration ==")?;
    writeln!(out, "Database:        {}", config.database)?;
    writeln!(out, "Region:          {}", config.region)?;
    if config.is_configured() {
        writeln!(out, "Output location: {}", config.output_location)?;
    } else {
        writeln!(
            out,
            "Output location: {} (placeholder, set ATHENA_OUTPUT_LOCATION)",
            config.output_location
        )?;
    }
    report.record("configuration", config.is_configured());

    writeln!(out, "\n== Schema ==")?;
    write!(out, "{}", catalog.describe())?;
    report.record("schema", !catalog.tables().is_empty());

    writeln!(out, "== Connectivity ==")?;
    let show = format!("SHOW TABLES IN {}", executor.database());
    let result = executor.execute_with_timeout(&show, SHOW_TABLES_WAIT_SECS).await;
    print_result(out, &result)?;
    report.record("show tables", result.success);

    writeln!(out, "\n== Sample query ==")?;
    match catalog.table_names().first() {
        Some(table) => {
            let sample = format!("SELECT * FROM {table} LIMIT 5");
            let result = executor.execute(&sample).await;
            print_result(out, &result)?;
            if let Some(first) = result.rows.first() {
                for (column, value) in first {
                    writeln!(out, "  {column}: {value}")?;
                }
            }
            report.record("sample query", result.success);
        }
        None => {
            writeln!(out, "No tables in catalog")?;
            report.record("sample query", false);
        }
    }

    writeln!(
        out,
        "\n{} passed, {} failed",
        report.passed.len(),
        report.failed.len()
    )?;
    if report.ok() {
        info!("Smoke test passed");
    } else {
        warn!(failed = ?report.failed, "Smoke test failed");
    }
    Ok(report)
}

fn print_result<W: Write>(out: &mut W, result: &QueryResult) -> std::io::Result<()> {
    writeln!(out, "SQL: {}", result.query)?;
    if result.success {
        writeln!(out, "Returned {} rows", result.row_count)?;
        writeln!(out, "Columns: {}", result.columns.join(", "))?;
    } else {
        writeln!(out, "Error: {}", result.error.as_deref().unwrap_or("Unknown error"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tlc_athena::{ExecutionStatus, ResultPage, ScriptedQueryService};

    fn configured() -> AthenaConfig {
        AthenaConfig {
            output_location: "s3://tlc-results/athena/".to_string(),
            ..AthenaConfig::default()
        }
    }

    fn tables_page() -> ResultPage {
        ResultPage {
            column_labels: vec!["tab_name".into()],
            rows: vec![
                vec![Some("tab_name".into())],
                vec![Some("gtp_tlc_data".into())],
                vec![Some("taxi_zones".into())],
            ],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn passes_against_healthy_service() {
        let config = configured();
        let service = Arc::new(ScriptedQueryService::succeeding(tables_page()));
        let executor = QueryExecutor::new(service.clone(), &config);
        let mut out = Vec::new();

        let report = run(&config, &SchemaCatalog::builtin(), &executor, &mut out)
            .await
            .unwrap();

        assert!(report.ok(), "{report:?}");
        assert_eq!(report.passed.len(), 4);

        let queries: Vec<String> = service.submissions().into_iter().map(|s| s.query).collect();
        assert_eq!(
            queries,
            vec![
                "SHOW TABLES IN nyc_tlc".to_string(),
                "SELECT * FROM gtp_tlc_data LIMIT 5".to_string(),
            ]
        );

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Database:        nyc_tlc"));
        assert!(text.contains("Table: taxi_zones"));
        assert!(text.contains("tab_name: gtp_tlc_data"));
        assert!(text.contains("4 passed, 0 failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn reports_placeholder_and_query_failures() {
        let config = AthenaConfig::default();
        let service = Arc::new(ScriptedQueryService::ending(
            ExecutionStatus::Failed,
            "Access denied",
        ));
        let executor = QueryExecutor::new(service, &config);
        let mut out = Vec::new();

        let report = run(&config, &SchemaCatalog::builtin(), &executor, &mut out)
            .await
            .unwrap();

        assert!(!report.ok());
        assert_eq!(report.failed, vec!["configuration", "show tables", "sample query"]);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(placeholder, set ATHENA_OUTPUT_LOCATION)"));
        assert!(text.contains("Error: Query failed: Access denied"));
    }
}
