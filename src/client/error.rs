//! Client-side error types.

use std::fmt;
use std::time::Duration;

use rmcp::ErrorData as McpError;
use serde_json::Value;
use thiserror::Error;

use super::session::SessionState;

/// Errors surfaced to callers of a [`Session`](super::Session).
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The server has no tool with this name.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A required argument was omitted.
    #[error("Missing argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },

    /// An argument had the wrong type.
    #[error("{message}")]
    InvalidArgumentType {
        tool: String,
        argument: String,
        message: String,
    },

    /// An argument was supplied that the tool does not declare.
    #[error("Unknown argument '{argument}' for tool '{tool}'")]
    UnknownArgument { tool: String, argument: String },

    /// The tool ran and failed. The session is still usable.
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecutionFailure { tool: String, message: String },

    /// A call did not complete in time, either against the client-side
    /// deadline or the server's own ceiling.
    #[error(
        "Call to '{tool}' timed out{}",
        .timeout.map(|t| format!(" after {:?}", t)).unwrap_or_default()
    )]
    Timeout {
        tool: String,
        timeout: Option<Duration>,
    },

    /// The connection is gone. The session is now closed.
    #[error("Transport closed: {0}")]
    TransportClosed(String),

    /// The operation is not allowed in the session's current state.
    #[error("Session is not ready (state: {0})")]
    NotReady(SessionState),

    /// The server could not be started or the handshake failed.
    #[error("Failed to connect: {0}")]
    Connect(String),

    /// The server answered with something the client does not understand.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn transport_closed<E: fmt::Display>(err: E) -> Self {
        Self::TransportClosed(err.to_string())
    }

    pub fn connect<E: fmt::Display>(err: E) -> Self {
        Self::Connect(err.to_string())
    }

    /// Whether this error ended the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TransportClosed(_) | Self::Connect(_))
    }

    /// Recover a typed error from a JSON-RPC error returned by `tools/call`.
    ///
    /// The server puts `{"kind", "tool", "argument"?}` in the error data;
    /// anything else is reported as a protocol error.
    pub fn from_rpc_error(tool: &str, error: &McpError) -> Self {
        let data = error.data.as_ref();
        let field = |key: &str| -> Option<String> {
            data.and_then(|d| d.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let tool = field("tool").unwrap_or_else(|| tool.to_string());
        let argument = field("argument").unwrap_or_default();

        match field("kind").as_deref() {
            Some("not_found") => Self::ToolNotFound(tool),
            Some("missing_argument") => Self::MissingArgument { tool, argument },
            Some("invalid_argument_type") => Self::InvalidArgumentType {
                tool,
                argument,
                message: error.message.to_string(),
            },
            Some("unknown_argument") => Self::UnknownArgument { tool, argument },
            _ => Self::Protocol(format!("{} (code {})", error.message, error.code.0)),
        }
    }

    /// Build the error for a `CallToolResult` flagged with `isError`.
    pub fn from_tool_failure(tool: &str, message: String, kind: Option<&str>) -> Self {
        match kind {
            Some("timeout") => Self::Timeout {
                tool: tool.to_string(),
                timeout: None,
            },
            _ => Self::ToolExecutionFailure {
                tool: tool.to_string(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_rpc_error_missing_argument() {
        let error = McpError::invalid_params(
            "Missing argument 'b' for tool 'add'",
            Some(json!({"kind": "missing_argument", "tool": "add", "argument": "b"})),
        );
        match ClientError::from_rpc_error("add", &error) {
            ClientError::MissingArgument { tool, argument } => {
                assert_eq!(tool, "add");
                assert_eq!(argument, "b");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_rpc_error_not_found() {
        let error = McpError::invalid_params(
            "Tool not found: nope",
            Some(json!({"kind": "not_found", "tool": "nope"})),
        );
        assert!(matches!(
            ClientError::from_rpc_error("nope", &error),
            ClientError::ToolNotFound(name) if name == "nope"
        ));
    }

    #[test]
    fn test_from_rpc_error_without_data_is_protocol() {
        let error = McpError::internal_error("boom", None);
        assert!(matches!(
            ClientError::from_rpc_error("add", &error),
            ClientError::Protocol(_)
        ));
    }

    #[test]
    fn test_tool_failure_kinds() {
        let err = ClientError::from_tool_failure("slow", "too slow".into(), Some("timeout"));
        assert!(matches!(err, ClientError::Timeout { timeout: None, .. }));
        assert_eq!(err.to_string(), "Call to 'slow' timed out");

        let err = ClientError::from_tool_failure("scene", "quota".into(), Some("execution_failed"));
        assert!(matches!(err, ClientError::ToolExecutionFailure { .. }));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ClientError::transport_closed("eof").is_fatal());
        assert!(!ClientError::ToolNotFound("x".into()).is_fatal());
        assert!(!ClientError::NotReady(SessionState::Unconnected).is_fatal());
    }
}
