//! Add tool definition.

use tracing::{info, instrument};

use super::{OperandParams, apply, binary_descriptor};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ToolArguments, ToolDescriptor};

/// Add tool - returns `a + b` as text.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add two numbers and return the sum.";

    pub fn descriptor() -> ToolDescriptor {
        binary_descriptor(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(a = %params.a, b = %params.b))]
    pub fn execute(params: &OperandParams) -> Result<ToolOutput, ToolError> {
        let sum = apply(params, i64::checked_add, |a, b| a + b)?;
        info!("{} + {} = {}", params.a, params.b, sum);
        Ok(ToolOutput::text(sum.to_string()))
    }
}

#[async_trait::async_trait]
impl ToolHandler for AddTool {
    async fn call(
        &self,
        arguments: ToolArguments,
        _context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(&arguments.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::Number;

    fn text_of(output: &ToolOutput) -> &str {
        match &output.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_add_integers() {
        let params = OperandParams {
            a: 5.into(),
            b: 3.into(),
        };
        let output = AddTool::execute(&params).unwrap();
        assert_eq!(text_of(&output), "8");
    }

    #[test]
    fn test_add_negative_and_float() {
        let params = OperandParams {
            a: (-2).into(),
            b: Number::from_f64(0.5).unwrap(),
        };
        let output = AddTool::execute(&params).unwrap();
        assert_eq!(text_of(&output), "-1.5");
    }

    #[test]
    fn test_descriptor() {
        let descriptor = AddTool::descriptor();
        assert_eq!(descriptor.name, "add");
        assert_eq!(descriptor.parameters.len(), 2);
        assert!(descriptor.parameters.iter().all(|p| p.required));
    }
}
