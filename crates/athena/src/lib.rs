pub mod config;
pub mod service;
pub mod client;
pub mod executor;
pub mod result;
pub mod schema;
pub mod mock;

pub use config::AthenaConfig;
pub use service::{AthenaError, ExecutionStatus, QueryService, ResultPage, StatusReport};
pub use client::AthenaClient;
pub use executor::{QueryExecutor, ROW_CAP};
pub use result::{QueryResult, Row};
pub use schema::{SchemaCatalog, SchemaError, TableSchema};
pub use mock::ScriptedQueryService;
