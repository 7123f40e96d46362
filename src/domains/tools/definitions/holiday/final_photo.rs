//! Final photo tool definition.

use tracing::{instrument, warn};

use super::{FINAL_PHOTO_FILE, SCENE_FILE, SELFIE_FILE, render_image};
use crate::domains::generation::{AspectRatio, ImageRequest};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ReturnKind, ToolArguments, ToolDescriptor};

const PROMPT: &str = "Generate a photorealistic close-up shot of a rustic wooden fireplace mantle.\n\n\
    Lighting: Warm, glowing ambient light from a fire below (out of frame).\n\
    Background: Softly blurred (bokeh) pine garland and twinkling lights.\n\n\
    Foreground Composition:\n\
    1. A wooden picture frame containing the [attached selfie image].\n\
       The face in the photo must be clearly visible.\n\
    2. A folded holiday greeting card standing upright next to the frame.\n\
       The front of the card displays the [attached holiday scene image] as a print.\n\n\
    Ensure the perspective is grounded and realistic, as if taken with a 50mm lens.";

/// Generate the mantle photo combining the avatar and the holiday scene.
pub struct GenerateFinalPhotoTool;

impl GenerateFinalPhotoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_final_photo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate the final photo: a fireplace mantle with the \
        framed avatar and a greeting card showing the holiday scene. Saves \
        generated_final_photo.png (16:9). Not idempotent.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION).returns(ReturnKind::ImageArtifact)
    }

    #[instrument(skip_all)]
    pub async fn execute(context: &ToolContext) -> Result<ToolOutput, ToolError> {
        let references: Vec<_> = [SELFIE_FILE, SCENE_FILE]
            .iter()
            .map(|file| context.artifacts().path_for(file))
            .collect();

        for reference in references.iter().filter(|p| !p.exists()) {
            warn!("Reference image {} has not been generated yet", reference.display());
        }

        let request =
            ImageRequest::new(PROMPT, AspectRatio::Widescreen).with_references(references);
        render_image(context, request, FINAL_PHOTO_FILE).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for GenerateFinalPhotoTool {
    async fn call(
        &self,
        _arguments: ToolArguments,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(context).await
    }
}
