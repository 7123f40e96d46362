//! Holiday MCP Server Library
//!
//! A Model Context Protocol tool server for holiday image generation, plus a
//! client driver for calling it.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, logging, path security, the
//!   MCP server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool registry, schema validation, invocation, definitions
//!   - **generation**: hosted image/text model client and artifact storage
//! - **client**: session state machine and driver for talking to a server
//!
//! # Example
//!
//! ```rust,no_run
//! use holiday_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
