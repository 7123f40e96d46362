//! Generation error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors raised while calling the hosted models or saving their output.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured.
    #[error("GOOGLE_API_KEY is not set; image generation is unavailable")]
    MissingApiKey,

    /// The HTTP request could not be completed.
    #[error("Request to generation API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Generation API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider answered, but without the expected payload.
    #[error("Generation API returned no usable output: {0}")]
    EmptyResponse(String),

    /// The payload could not be decoded.
    #[error("Failed to decode generation output: {0}")]
    Decode(String),

    /// Writing an artifact to disk failed.
    #[error("Failed to write artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Create an API status error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an empty-response error.
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyResponse(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an artifact write error.
    pub fn artifact(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Artifact {
            path: path.into(),
            source,
        }
    }
}
