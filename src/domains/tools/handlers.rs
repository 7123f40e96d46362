//! Tool handler trait and output types.
//!
//! Every tool definition implements [`ToolHandler`]. The handler receives
//! arguments that have already been validated against its declared schema,
//! plus the shared [`ToolContext`].

use rmcp::model::Content;
use serde::Serialize;

use super::context::ToolContext;
use super::error::ToolError;
use super::schema::ToolArguments;

/// Output from a successful tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Ordered content parts returned to the client.
    pub content: Vec<Content>,

    /// Optional structured payload matching the tool's output schema.
    pub structured: Option<serde_json::Value>,
}

impl ToolOutput {
    /// Create an output with a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text.into())],
            structured: None,
        }
    }

    /// Attach a structured payload.
    pub fn with_structured<T: Serialize>(mut self, value: &T) -> Result<Self, ToolError> {
        let value = serde_json::to_value(value).map_err(|e| {
            ToolError::execution_failed(format!("Failed to serialize tool output: {}", e))
        })?;
        self.structured = Some(value);
        Ok(self)
    }
}

/// Trait implemented by every callable tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments.
    async fn call(
        &self,
        arguments: ToolArguments,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError>;
}
