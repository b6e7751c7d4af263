//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::agent::{parse_tool_args, ToolContext};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "prepdesk";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Prepdesk.
pub struct McpServer {
    tools: Arc<ToolContext>,
}

impl McpServer {
    pub fn new(tools: Arc<ToolContext>) -> Self {
        Self { tools }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("Prepdesk MCP server starting...");

        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Serve newline-delimited JSON-RPC requests until `input` is exhausted.
    pub async fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, -32700, "Parse error"))
                }
            };

            if let Some(response) = response {
                writeln!(output, "{}", serde_json::to_string(&response)?)?;
                output.flush()?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request. Notifications get no response.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("MCP request: {}", request.method);

        let Some(id) = request.id else {
            debug!("Notification {} needs no response", request.method);
            return None;
        };
        let id = Some(id);

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            // Some clients send this as a request rather than a notification
            "initialized" | "notifications/initialized" => {
                Some(JsonRpcResponse::success(id, json!({})))
            }
            "tools/list" => Some(respond(id, ToolsListResult { tools: get_tools() })),
            "tools/call" => Some(self.handle_tools_call(id, request.params).await),
            _ => Some(JsonRpcResponse::error(
                id,
                -32601,
                &format!("Method not found: {}", request.method),
            )),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        respond(id, result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        let result = match parse_tool_args(&params.name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => ToolCallResult::error(e.to_string()),
            },
            Err(e) => ToolCallResult::error(e.to_string()),
        };

        respond(id, result)
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, &format!("Internal error: {}", e)),
    }
}
