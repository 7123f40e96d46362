//! Multiply tool definition.

use tracing::{info, instrument};

use super::{OperandParams, apply, binary_descriptor};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ToolArguments, ToolDescriptor};

/// Multiply tool - returns `a * b` as text.
pub struct MultiplyTool;

impl MultiplyTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "multiply";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Multiply two numbers and return the product.";

    pub fn descriptor() -> ToolDescriptor {
        binary_descriptor(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(a = %params.a, b = %params.b))]
    pub fn execute(params: &OperandParams) -> Result<ToolOutput, ToolError> {
        let product = apply(params, i64::checked_mul, |a, b| a * b)?;
        info!("{} * {} = {}", params.a, params.b, product);
        Ok(ToolOutput::text(product.to_string()))
    }
}

#[async_trait::async_trait]
impl ToolHandler for MultiplyTool {
    async fn call(
        &self,
        arguments: ToolArguments,
        _context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(&arguments.parse()?)
    }
}
