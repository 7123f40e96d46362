//! Request and response types for image generation.

use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aspect ratios accepted by the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Widescreen => "16:9",
            Self::Vertical => "9:16",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,

    /// Previously generated images the prompt refers to.
    pub reference_images: Vec<PathBuf>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio,
            reference_images: Vec::new(),
        }
    }

    pub fn with_references(mut self, references: Vec<PathBuf>) -> Self {
        self.reference_images = references;
        self
    }
}

/// Raw image bytes returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}
