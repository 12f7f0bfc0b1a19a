//! Model Context Protocol front end for the NYC TLC tools.
//!
//! An assistant connects over stdio, lists the tools of a
//! [`ToolRegistry`](tlc_tool_runtime::ToolRegistry) and calls them.
//!
//! ```no_run
//! use tlc_mcp::server::McpServer;
//! use tlc_mcp::transport::StdioTransport;
//! use tlc_tool_runtime::ToolRegistry;
//!
//! # async fn example() {
//! let registry = ToolRegistry::new();
//! let mut server = McpServer::new(registry);
//! let mut transport = StdioTransport::new();
//! server.run(&mut transport).await.unwrap();
//! # }
//! ```

pub mod types;
pub mod transport;
pub mod server;
pub mod error;

pub use types::*;
pub use transport::{McpTransport, StdioTransport, ChannelTransport};
pub use server::McpServer;
pub use error::McpError;
