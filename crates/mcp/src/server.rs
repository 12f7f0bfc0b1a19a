//! Request dispatch for the tool server.
//!
//! Requests are answered one at a time in arrival order; a `tools/call`
//! holds the loop until its query finishes.

use serde::Serialize;
use serde_json::Value;

use tlc_tool_runtime::ToolRegistry;

use crate::error::McpError;
use crate::transport::McpTransport;
use crate::types::*;

/// Serves the tools of one [`ToolRegistry`].
pub struct McpServer {
    registry: ToolRegistry,
    server_name: String,
    server_version: String,
    initialized: bool,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_name: "nyc-tlc-athena".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            initialized: false,
        }
    }

    /// Name reported in `serverInfo`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Answer messages until the transport closes.
    pub async fn run<T: McpTransport>(&mut self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!(server = %self.server_name, "MCP server starting");

        while let Some(line) = transport.receive().await? {
            tracing::debug!(message = %line, "Received message");

            if let Some(response) = self.handle_line(&line).await {
                let json = serde_json::to_string(&response)?;
                tracing::debug!(response = %json, "Sending response");
                transport.send(&json).await?;
            }
        }

        tracing::info!("Transport closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON");
                return Some(error_response(None::<RpcId>, McpError::JsonParse(e)));
            }
        };

        if raw.get("id").is_none() {
            match serde_json::from_value::<JsonRpcNotification>(raw) {
                Ok(notif) => self.handle_notification(&notif),
                Err(e) => tracing::debug!(error = %e, "Ignoring malformed notification"),
            }
            return None;
        }

        let id = RpcId::from_raw(&raw);
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => Some(self.handle_request(&request).await),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC request");
                Some(error_response(id, McpError::InvalidRequest(e.to_string())))
            }
        }
    }

    pub async fn handle_request(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, &request.params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, &request.params).await,
            method => {
                tracing::warn!(method = %method, "Unknown method");
                error_response(id, McpError::MethodNotFound(method.to_string()))
            }
        }
    }

    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                // Queries already submitted keep running server-side.
                tracing::debug!("Client cancelled a request");
            }
            method => {
                tracing::debug!(method = %method, "Unknown notification, ignoring");
            }
        }
    }

    fn handle_initialize(&mut self, id: RpcId, params: &Option<Value>) -> JsonRpcResponse {
        match params
            .clone()
            .map(serde_json::from_value::<InitializeParams>)
        {
            Some(Ok(p)) => tracing::info!(
                client = %p.client_info.name,
                protocol_version = %p.protocol_version,
                "Handling initialize"
            ),
            _ => tracing::info!("Handling initialize"),
        }
        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: self.server_version.clone(),
            },
        };

        success_response(id, result)
    }

    fn handle_list_tools(&self, id: RpcId) -> JsonRpcResponse {
        tracing::debug!("Handling tools/list");

        let tools: Vec<ToolInfo> = self.registry.list().into_iter().map(ToolInfo::from).collect();
        success_response(id, ListToolsResult { tools })
    }

    async fn handle_call_tool(&self, id: RpcId, params: &Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return error_response(id, McpError::InvalidParams("missing params".to_string()))
            }
        };

        let call_params: CallToolParams = match serde_json::from_value(params.clone()) {
            Ok(p) => p,
            Err(e) => return error_response(id, McpError::InvalidParams(e.to_string())),
        };

        tracing::debug!(tool = %call_params.name, "Handling tools/call");

        let tool = match self.registry.get(&call_params.name) {
            Some(t) => t,
            None => return error_response(id, McpError::ToolNotFound(call_params.name)),
        };

        let result = match tool.execute(call_params.arguments).await {
            Ok(tool_result) => CallToolResult::from(tool_result),
            Err(e) => {
                tracing::warn!(tool = %call_params.name, error = %e, "Tool execution failed");
                CallToolResult::text(McpError::ToolExecution(e.to_string()).to_string(), true)
            }
        };

        success_response(id, result)
    }
}

fn success_response(id: RpcId, result: impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(val) => JsonRpcResponse::success(id, val),
        Err(e) => error_response(id, McpError::Serialize(e.to_string())),
    }
}

fn error_response(id: impl Into<Option<RpcId>>, err: McpError) -> JsonRpcResponse {
    JsonRpcResponse::error(id, err.code(), err.to_string())
}
