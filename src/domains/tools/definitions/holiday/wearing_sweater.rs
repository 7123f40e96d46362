//! Avatar-in-sweater tool definition.

use serde::Deserialize;
use tracing::{info, instrument};

use super::{FALLBACK_PERSON, SELFIE_FILE, describe_person, render_image};
use crate::domains::generation::{AspectRatio, ImageRequest};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolHandler, ToolOutput};
use crate::domains::tools::schema::{ParamSpec, ParamType, ReturnKind, ToolArguments, ToolDescriptor};

/// Pattern used when the caller does not name one.
pub const DEFAULT_PATTERN: &str = "festive holiday pattern";

/// Parameters for the wearing-sweater tool.
#[derive(Debug, Clone, Deserialize)]
pub struct WearingSweaterParams {
    pub pattern_description: String,

    /// Photo of the user; the avatar resembles them when given.
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Generate a kawaii cartoon character wearing a patterned sweater.
pub struct GenerateWearingSweaterTool;

impl GenerateWearingSweaterTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_wearing_sweater";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate a cute, kawaii, cartoon-style character wearing \
        a sweater with the specified pattern. If image_path points to a photo of the user, the \
        avatar will resemble them. Saves generated_selfie.png (1:1). Not idempotent.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(
                ParamSpec::optional("pattern_description", ParamType::String)
                    .with_default(DEFAULT_PATTERN)
                    .describe("Pattern on the sweater (e.g. \"snowflake pattern\", \"reindeer pattern\")"),
            )
            .param(
                ParamSpec::optional("image_path", ParamType::String)
                    .describe("Absolute path to an uploaded photo of the user"),
            )
            .returns(ReturnKind::ImageArtifact)
    }

    pub fn prompt(person: &str, pattern: &str) -> String {
        format!(
            "Generate a cute, kawaii, cartoon-style 3D render of {person} wearing a knitted sweater.\n\n\
             Sweater Pattern: {pattern}\n\n\
             Style:\n\
             - Cute, chibi, or cartoon aesthetic.\n\
             - Bright, cheerful colors.\n\
             - Soft lighting, high fidelity 3D render (like a high-quality toy or animation character).\n\
             - The character should be facing the camera and smiling.\n\
             - The character should resemble the description: {person}\n\n\
             Background: Simple, festive, or winter-themed background that complements the character."
        )
    }

    #[instrument(skip_all, fields(pattern = %params.pattern_description))]
    pub async fn execute(
        params: &WearingSweaterParams,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let person = match params.image_path.as_deref() {
            Some(path) if !path.trim().is_empty() => describe_person(context, path).await,
            _ => FALLBACK_PERSON.to_string(),
        };
        info!("Rendering avatar of {}", person);

        let request = ImageRequest::new(
            Self::prompt(&person, &params.pattern_description),
            AspectRatio::Square,
        );
        render_image(context, request, SELFIE_FILE).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for GenerateWearingSweaterTool {
    async fn call(
        &self,
        arguments: ToolArguments,
        context: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Self::execute(&arguments.parse()?, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_in;
    use super::*;
    use crate::domains::generation::FakeBackend;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_default_pattern_applied_by_validation() {
        let arguments = GenerateWearingSweaterTool::descriptor().validate(None).unwrap();
        let params: WearingSweaterParams = arguments.parse().unwrap();
        assert_eq!(params.pattern_description, DEFAULT_PATTERN);
        assert!(params.image_path.is_none());
    }

    #[tokio::test]
    async fn test_without_photo_uses_fallback_person() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let context = context_in(temp_dir.path(), backend.clone(), None);

        let params = WearingSweaterParams {
            pattern_description: "reindeer pattern".to_string(),
            image_path: None,
        };
        GenerateWearingSweaterTool::execute(&params, &context)
            .await
            .unwrap();

        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains(FALLBACK_PERSON));
        assert!(prompt.contains("reindeer pattern"));
        assert_eq!(backend.describe_calls(), 0);
        assert!(temp_dir.path().join(SELFIE_FILE).exists());
    }

    #[tokio::test]
    async fn test_with_photo_uses_description() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("me.jpg");
        std::fs::write(&photo, b"photo").unwrap();

        let backend = Arc::new(FakeBackend::new().with_description("a girl with curly red hair"));
        let context = context_in(temp_dir.path(), backend.clone(), Some(temp_dir.path()));

        let params = WearingSweaterParams {
            pattern_description: DEFAULT_PATTERN.to_string(),
            image_path: Some(photo.display().to_string()),
        };
        GenerateWearingSweaterTool::execute(&params, &context)
            .await
            .unwrap();

        assert_eq!(backend.describe_calls(), 1);
        assert!(backend.requests()[0].prompt.contains("a girl with curly red hair"));
    }
}
