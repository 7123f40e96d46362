//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, and serves the holiday tools on
//! the configured transport.

use anyhow::Result;
use tracing::info;

use holiday_mcp_server::core::config::LoggingConfig;
use holiday_mcp_server::core::{Config, McpServer, TransportService, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env())?;

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config)?;

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}
