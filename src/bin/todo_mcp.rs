//! MCP server binary for the todo tracker.
//!
//! Runs the todo MCP server over stdio transport so agents and MCP clients
//! can manage the same todos as the `todo` CLI.

use rmcp::ServiceExt;
use todo_tracker::mcp::TodosServer;
use todo_tracker::mcp_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging first (stdout belongs to the JSON-RPC stream)
    if let Err(e) = mcp_logging::init() {
        eprintln!("Warning: MCP logging init failed: {e}");
    }
    mcp_logging::install_panic_hook();

    let server = TodosServer::open_default()?;
    mcp_logging::log_event("MCP server created, starting stdio transport");
    let service = server.serve(rmcp::transport::stdio()).await?;
    mcp_logging::log_event("MCP server running");
    service.waiting().await?;
    mcp_logging::log_event("MCP server stopped");

    Ok(())
}
