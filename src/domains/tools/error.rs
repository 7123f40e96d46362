//! Tool-specific error types.

use std::time::Duration;

use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::ParamType;
use crate::domains::generation::GenerationError;

/// Stable, serializable classification of a [`ToolError`].
///
/// This is what travels over the wire in error payloads so that clients can
/// recover the error kind without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    NotFound,
    MissingArgument,
    InvalidArgumentType,
    UnknownArgument,
    ExecutionFailed,
    Timeout,
    DuplicateTool,
    InvalidSchema,
}

impl ToolErrorKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::MissingArgument => "missing_argument",
            Self::InvalidArgumentType => "invalid_argument_type",
            Self::UnknownArgument => "unknown_argument",
            Self::ExecutionFailed => "execution_failed",
            Self::Timeout => "timeout",
            Self::DuplicateTool => "duplicate_tool",
            Self::InvalidSchema => "invalid_schema",
        }
    }
}

/// Errors that can occur during tool registration and invocation.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A required argument was not supplied.
    #[error("Missing argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },

    /// A supplied argument could not be coerced to its declared type.
    #[error("Invalid type for argument '{argument}' of tool '{tool}': expected {expected}, got {actual}")]
    InvalidArgumentType {
        tool: String,
        argument: String,
        expected: ParamType,
        actual: String,
    },

    /// An argument was supplied that the tool does not declare.
    #[error("Unknown argument '{argument}' for tool '{tool}'")]
    UnknownArgument { tool: String, argument: String },

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The tool did not finish within the configured ceiling.
    #[error("Tool execution timed out after {0:?}")]
    Timeout(Duration),

    /// A tool with the same name is already registered.
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// The declared parameter schema is inconsistent.
    #[error("Invalid schema for tool '{tool}': {reason}")]
    InvalidSchema { tool: String, reason: String },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "missing argument" error.
    pub fn missing_argument(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    /// Create a new "unknown argument" error.
    pub fn unknown_argument(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::UnknownArgument {
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a new "invalid schema" error.
    pub fn invalid_schema(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::NotFound(_) => ToolErrorKind::NotFound,
            Self::MissingArgument { .. } => ToolErrorKind::MissingArgument,
            Self::InvalidArgumentType { .. } => ToolErrorKind::InvalidArgumentType,
            Self::UnknownArgument { .. } => ToolErrorKind::UnknownArgument,
            Self::ExecutionFailed(_) => ToolErrorKind::ExecutionFailed,
            Self::Timeout(_) => ToolErrorKind::Timeout,
            Self::DuplicateTool(_) => ToolErrorKind::DuplicateTool,
            Self::InvalidSchema { .. } => ToolErrorKind::InvalidSchema,
        }
    }

    /// Whether the call was rejected before the tool function ran.
    pub fn is_dispatch_error(&self) -> bool {
        matches!(
            self.kind(),
            ToolErrorKind::NotFound
                | ToolErrorKind::MissingArgument
                | ToolErrorKind::InvalidArgumentType
                | ToolErrorKind::UnknownArgument
        )
    }

    /// The argument this error refers to, if any.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { argument, .. }
            | Self::InvalidArgumentType { argument, .. }
            | Self::UnknownArgument { argument, .. } => Some(argument),
            _ => None,
        }
    }

    /// Convert into a JSON-RPC error carrying the kind in its data payload.
    pub fn to_error_data(&self, tool: &str) -> McpError {
        let mut data = serde_json::json!({
            "kind": self.kind(),
            "tool": tool,
        });
        if let Some(argument) = self.argument() {
            data["argument"] = serde_json::Value::String(argument.to_string());
        }
        McpError::invalid_params(self.to_string(), Some(data))
    }
}

impl From<GenerationError> for ToolError {
    fn from(err: GenerationError) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}
