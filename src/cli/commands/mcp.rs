//! MCP command implementation.

use crate::app::App;
use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let app = App::new(settings)?;
    McpServer::new(app.tools()).run().await
}
