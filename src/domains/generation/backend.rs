//! The seam between tools and the hosted models.

use async_trait::async_trait;

use super::error::GenerationResult;
use super::types::{GeneratedImage, ImageRequest};

/// A hosted text/image generation provider.
///
/// Each method is a single request/response round trip with no retries.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate one image from a prompt.
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<GeneratedImage>;

    /// Ask the text model to describe an image according to `prompt`.
    async fn describe_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> GenerationResult<String>;
}
