mod cli;
mod logging;
mod smoke;

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use tlc_athena::{AthenaClient, AthenaConfig, QueryExecutor, SchemaCatalog};
use tlc_mcp::{McpServer, StdioTransport};
use tlc_tool_runtime::{register_tlc_tools, KeywordPrefixClassifier, ToolRegistry};

use crate::cli::{Cli, Command};

async fn build_executor(config: &AthenaConfig) -> QueryExecutor {
    let client = AthenaClient::new(config).await;
    QueryExecutor::new(Arc::new(client), config)
}

async fn serve(
    config: AthenaConfig,
    catalog: SchemaCatalog,
    server_name: &str,
) -> anyhow::Result<()> {
    if !config.is_configured() {
        warn!(
            output_location = %config.output_location,
            "ATHENA_OUTPUT_LOCATION is not set; queries will fail until it points at a writable S3 prefix"
        );
    }

    let executor = Arc::new(build_executor(&config).await);
    let mut registry = ToolRegistry::new();
    register_tlc_tools(
        &mut registry,
        executor,
        Arc::new(catalog),
        Arc::new(KeywordPrefixClassifier::default()),
    )?;

    info!(
        database = %config.database,
        region = %config.region,
        tools = registry.len(),
        "Serving MCP over stdio"
    );

    let mut server = McpServer::new(registry).with_name(server_name);
    let mut transport = StdioTransport::new();
    server.run(&mut transport).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tlc_athena::config::load_dotenv();
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = cli.apply(AthenaConfig::from_env());
    let catalog = SchemaCatalog::load(config.schema_file.as_deref())?;

    match cli.command() {
        Command::Serve => serve(config, catalog, &cli.server_name).await,
        Command::Schema => {
            print!("{}", catalog.describe());
            Ok(())
        }
        Command::SmokeTest => {
            let executor = build_executor(&config).await;
            let mut stdout = std::io::stdout();
            let report = smoke::run(&config, &catalog, &executor, &mut stdout).await?;
            if !report.ok() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
