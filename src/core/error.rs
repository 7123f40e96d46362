//! Error types and handling for the MCP server.
//!
//! Each layer has its own `thiserror` enum; this module folds them into one
//! [`Error`] for code that spans layers (server construction, startup).

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the generation domain.
    #[error("Generation error: {0}")]
    Generation(#[from] crate::domains::generation::GenerationError),

    /// Error raised by a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::DuplicateTool("add".into()).into();
        assert!(matches!(err, Error::Tool(_)));
        assert_eq!(err.to_string(), "Tool error: Duplicate tool: add");
    }
}
