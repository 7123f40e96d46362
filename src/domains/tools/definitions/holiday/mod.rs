//! Holiday image tools.
//!
//! - `generate_holiday_scene`: themed winter scene (16:9)
//! - `generate_sweater_pattern`: flat knitted sweater texture (1:1)
//! - `generate_wearing_sweater`: cartoon avatar wearing a sweater (1:1)
//! - `generate_final_photo`: mantle shot referencing the avatar and scene (16:9)
//!
//! Every tool makes one request to the generation backend and writes a single
//! well-known file into the output directory. None of them are idempotent.

pub mod final_photo;
pub mod pattern;
pub mod scene;
pub mod wearing_sweater;

pub use final_photo::GenerateFinalPhotoTool;
pub use pattern::GenerateSweaterPatternTool;
pub use scene::GenerateHolidaySceneTool;
pub use wearing_sweater::GenerateWearingSweaterTool;

use std::path::Path;

use tracing::{info, warn};

use crate::core::security::validate_path;
use crate::domains::generation::ImageRequest;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolOutput;

pub const SCENE_FILE: &str = "generated_scene.png";
pub const PATTERN_FILE: &str = "generated_pattern.png";
pub const SELFIE_FILE: &str = "generated_selfie.png";
pub const FINAL_PHOTO_FILE: &str = "generated_final_photo.png";

/// Used whenever a photo cannot be analysed.
pub const FALLBACK_PERSON: &str = "a happy person";

const ANALYSIS_PROMPT: &str = r#"
Describe the physical appearance of the person in this image specifically for creating a cute, kawaii cartoon avatar.
Focus on:
1. Gender and approximate age group (e.g., young boy, woman).
2. Hair color, length, and style.
3. Eye color (if visible) and glasses (if worn).
4. Facial hair (if any).
5. Distinctive features (e.g., freckles, hat).

Keep the description concise and descriptive (e.g., "a young woman with long brown hair and round glasses").
Do not describe the clothing or background.
"#;

/// Generate one image and save it as `file_name`.
async fn render_image(
    context: &ToolContext,
    request: ImageRequest,
    file_name: &str,
) -> Result<ToolOutput, ToolError> {
    info!(
        "Generating {} with prompt: {}...",
        file_name,
        prompt_preview(&request.prompt)
    );

    let image = context.backend().generate_image(&request).await?;
    let artifact = context
        .artifacts()
        .save(file_name, &image, request.aspect_ratio)
        .await?;

    ToolOutput::text(format!("Done! Saved at {}", file_name)).with_structured(&artifact)
}

/// Describe the person in the photo at `image_path`.
///
/// Never fails: any problem is logged and [`FALLBACK_PERSON`] is returned.
async fn describe_person(context: &ToolContext, image_path: &str) -> String {
    info!("Analyzing person features from: {}", image_path);

    let path = match validate_path(image_path, &context.config().security) {
        Ok(path) => path,
        Err(e) => {
            warn!("Image not usable for analysis: {}", e);
            return FALLBACK_PERSON.to_string();
        }
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return FALLBACK_PERSON.to_string();
        }
    };

    match context
        .backend()
        .describe_image(ANALYSIS_PROMPT.trim(), &bytes, mime_type_for(&path))
        .await
    {
        Ok(description) if !description.trim().is_empty() => {
            let description = description.trim().to_string();
            info!("Person description: {}", description);
            description
        }
        Ok(_) => FALLBACK_PERSON.to_string(),
        Err(e) => {
            warn!("Error analyzing person features: {}", e);
            FALLBACK_PERSON.to_string()
        }
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/png",
    }
}

fn prompt_preview(prompt: &str) -> String {
    prompt.trim().chars().take(50).collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::context_in;
    use super::*;
    use crate::domains::generation::FakeBackend;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("me.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("me")), "image/png");
    }

    #[tokio::test]
    async fn test_describe_person_missing_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let context = context_in(temp_dir.path(), backend.clone(), None);

        let missing = temp_dir.path().join("nope.png");
        let description = describe_person(&context, missing.to_str().unwrap()).await;

        assert_eq!(description, FALLBACK_PERSON);
        assert_eq!(backend.describe_calls(), 0);
    }

    #[tokio::test]
    async fn test_describe_person_outside_root_falls_back() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let photo = outside.path().join("me.png");
        std::fs::write(&photo, b"photo").unwrap();

        let backend = Arc::new(FakeBackend::new());
        let context = context_in(root.path(), backend.clone(), Some(root.path()));

        let description = describe_person(&context, photo.to_str().unwrap()).await;
        assert_eq!(description, FALLBACK_PERSON);
        assert_eq!(backend.describe_calls(), 0);
    }

    #[tokio::test]
    async fn test_describe_person_provider_failure_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("me.jpg");
        std::fs::write(&photo, b"photo").unwrap();

        let backend = Arc::new(FakeBackend::new().failing_describe("quota exceeded"));
        let context = context_in(temp_dir.path(), backend.clone(), None);

        let description = describe_person(&context, photo.to_str().unwrap()).await;
        assert_eq!(description, FALLBACK_PERSON);
        assert_eq!(backend.describe_calls(), 1);
    }

    #[tokio::test]
    async fn test_describe_person_uses_backend_answer() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("me.jpg");
        std::fs::write(&photo, b"photo").unwrap();

        let backend = Arc::new(FakeBackend::new().with_description("  a man with a red beard\n"));
        let context = context_in(temp_dir.path(), backend, Some(temp_dir.path()));

        let description = describe_person(&context, photo.to_str().unwrap()).await;
        assert_eq!(description, "a man with a red beard");
    }
}
