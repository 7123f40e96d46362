//! Holiday scene tool definition.

use serde::Deserialize;
use tracing::instrument;

use super::{SCENE_FILE, render_image};
use crate::domains::generation::{AspectRatio, ImageRequest};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ParamSpec, ParamType, ReturnKind, ToolArguments, ToolDescriptor};

/// Parameters for the holiday scene tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneParams {
    /// Theme woven into the decor or landscape.
    pub interest: String,
}

/// Generate a cozy 3D winter scene around the user's interest.
pub struct GenerateHolidaySceneTool;

impl GenerateHolidaySceneTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_holiday_scene";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate a holiday scene image themed around an interest. \
        Saves generated_scene.png (16:9). Not idempotent: each call produces a new image.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(
                ParamSpec::required("interest", ParamType::String)
                    .describe("Theme or hobby to integrate into the scene (e.g. \"skiing\", \"cats\")"),
            )
            .returns(ReturnKind::ImageArtifact)
    }

    pub fn prompt(interest: &str) -> String {
        format!(
            "Create a cozy, high-fidelity 3D render of a winter holiday scene.\n\
             The scene should be warm and inviting with soft cinematic lighting.\n\n\
             Seamlessly integrate the following specific theme/interest into the \
             holiday decor or landscape: {interest}.\n\n\
             The style should be whimsical but detailed.\n\
             Aspect Ratio: 16:9 Landscape."
        )
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(interest = %params.interest))]
    pub async fn execute(
        params: &SceneParams,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let request = ImageRequest::new(Self::prompt(&params.interest), AspectRatio::Widescreen);
        render_image(context, request, SCENE_FILE).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for GenerateHolidaySceneTool {
    async fn call(
        &self,
        arguments: ToolArguments,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(&arguments.parse()?, context).await
    }
}
