//! MCP server command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::Session;
use crate::config::Config;
use crate::mcp::NavigatorServer;

/// Serve the navigation tools over stdio until the client disconnects.
pub async fn run(root: &Path, config: &Config) -> Result<()> {
    let session = Session::start(root, config).await?;

    info!("Starting MCP server with stdio transport for {}", root.display());
    let server = NavigatorServer::new(session.navigator().clone(), root.to_path_buf());
    let outcome = server.run().await;

    session.close().await;
    outcome
}
