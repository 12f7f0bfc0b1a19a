pub mod tool;
pub mod tools;
pub mod registry;
pub mod classify;

pub use tool::{Tool, ToolDefinition, ToolError, ToolResult};
pub use registry::{RegistryError, ToolRegistry};
pub use classify::{KeywordPrefixClassifier, QueryClassifier};
pub use tools::{register_tlc_tools, GenerateSqlTool, GetSchemaTool, QueryTlcDataTool};
