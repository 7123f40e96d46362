//! Sweater pattern tool definition.

use tracing::instrument;

use super::{PATTERN_FILE, render_image};
use crate::domains::generation::{AspectRatio, ImageRequest};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ReturnKind, ToolArguments, ToolDescriptor};

const PROMPT: &str = "Design a seamless, tileable \"ugly holiday sweater\" pattern.\n\
    The design should mimic a knitted wool texture with visible stitching details.\n\
    Use a chaotic but festive color palette (reds, greens, whites, golds).\n\n\
    View: Top-down, flat 2D texture map.\n\
    Do NOT show a shirt, a model, or folds. Show ONLY the rectangular pattern design.";

/// Generate a flat "ugly holiday sweater" texture.
pub struct GenerateSweaterPatternTool;

impl GenerateSweaterPatternTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_sweater_pattern";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate an ugly holiday sweater pattern. \
        Saves generated_pattern.png (1:1). Not idempotent.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION).returns(ReturnKind::ImageArtifact)
    }

    #[instrument(skip_all)]
    pub async fn execute(context: &ToolContext) -> Result<ToolOutput, ToolError> {
        render_image(
            context,
            ImageRequest::new(PROMPT, AspectRatio::Square),
            PATTERN_FILE,
        )
        .await
    }
}

#[async_trait::async_trait]
impl ToolHandler for GenerateSweaterPatternTool {
    async fn call(
        &self,
        _arguments: ToolArguments,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(context).await
    }
}
