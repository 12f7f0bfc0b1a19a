//! Command-line arguments.

use clap::{Parser, Subcommand};

use tlc_athena::AthenaConfig;

/// MCP server exposing NYC TLC data in AWS Athena to an AI assistant.
///
/// Configuration comes from the environment (and `.env`); flags given here
/// override it.
#[derive(Parser, Debug)]
#[command(name = "tlc-athena-mcp", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Athena database to query (overrides ATHENA_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// S3 location for query results (overrides ATHENA_OUTPUT_LOCATION)
    #[arg(long, global = true)]
    pub output_location: Option<String>,

    /// AWS region (overrides ATHENA_REGION / AWS_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Default seconds to wait for a query (overrides ATHENA_MAX_WAIT_SECONDS)
    #[arg(long, global = true)]
    pub max_wait_seconds: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "TLC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Server name reported to MCP clients
    #[arg(long, global = true, env = "TLC_SERVER_NAME", default_value = "nyc-tlc-athena")]
    pub server_name: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Print the table catalog and exit
    Schema,
    /// Check configuration and run sample queries against Athena
    SmokeTest,
}

impl Cli {
    /// Layer flag overrides on top of the environment config.
    pub fn apply(&self, mut config: AthenaConfig) -> AthenaConfig {
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(output_location) = &self.output_location {
            config.output_location = output_location.clone();
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(secs) = self.max_wait_seconds {
            config.max_wait_seconds = secs;
        }
        config
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
