//! Persisting generated images to the output directory.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{GenerationError, GenerationResult};
use super::types::{AspectRatio, GeneratedImage};

/// Metadata about an image written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedArtifact {
    /// File name inside the output directory.
    pub file_name: String,

    /// Path the file was written to.
    pub path: String,

    /// Size of the file in bytes.
    pub size_bytes: u64,

    /// MIME type reported by the provider.
    pub mime_type: String,

    /// Aspect ratio the image was requested with.
    pub aspect_ratio: AspectRatio,

    /// RFC 3339 timestamp of when the file was written.
    pub generated_at: String,
}

/// Writes generated images under a fixed output directory.
///
/// Each tool owns one well-known file name, so a later call overwrites the
/// previous result of the same tool.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a file with this name would be written to.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Write `image` to `file_name`, creating the output directory if needed.
    pub async fn save(
        &self,
        file_name: &str,
        image: &GeneratedImage,
        aspect_ratio: AspectRatio,
    ) -> GenerationResult<GeneratedArtifact> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| GenerationError::artifact(&self.output_dir, e))?;

        let path = self.path_for(file_name);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| GenerationError::artifact(&path, e))?;

        info!("Saved {} ({} bytes)", path.display(), image.bytes.len());

        Ok(GeneratedArtifact {
            file_name: file_name.to_string(),
            path: path.display().to_string(),
            size_bytes: image.bytes.len() as u64,
            mime_type: image.mime_type.clone(),
            aspect_ratio,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
