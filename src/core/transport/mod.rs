//! Transport layer for the MCP server.
//!
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **TCP**: One MCP session per accepted TCP connection - feature: `tcp`
//!
//! Framing and JSON-RPC handling are delegated to `rmcp`; each transport only
//! owns the connection lifecycle and hands the byte stream to [`McpServer`].
//!
//! [`McpServer`]: crate::core::McpServer

mod config;
mod error;
mod service;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
