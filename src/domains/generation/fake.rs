//! Scripted in-process generation backend.
//!
//! [`FakeBackend`] stands in for the hosted API in tests and local demos. It
//! answers every image request with the same bytes, every describe request
//! with the same text, and records what it was asked.
//!
//! # Example
//!
//! ```
//! use holiday_mcp_server::domains::generation::{
//!     AspectRatio, FakeBackend, GenerativeBackend, ImageRequest,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = FakeBackend::new().with_description("a person in a red scarf");
//!
//! let image = backend
//!     .generate_image(&ImageRequest::new("a snowy cabin", AspectRatio::Square))
//!     .await
//!     .unwrap();
//! assert!(!image.bytes.is_empty());
//! assert_eq!(backend.requests()[0].prompt, "a snowy cabin");
//! # }
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::backend::GenerativeBackend;
use super::error::{GenerationError, GenerationResult};
use super::types::{GeneratedImage, ImageRequest};

/// Smallest valid PNG signature; enough for anything that sniffs the header.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Backend that returns canned output without touching the network.
#[derive(Debug)]
pub struct FakeBackend {
    image: GeneratedImage,
    description: String,
    image_failure: Option<String>,
    describe_failure: Option<String>,
    requests: Mutex<Vec<ImageRequest>>,
    describe_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            image: GeneratedImage {
                bytes: PNG_SIGNATURE.to_vec(),
                mime_type: "image/png".to_string(),
            },
            description: "a person smiling at the camera".to_string(),
            image_failure: None,
            describe_failure: None,
            requests: Mutex::new(Vec::new()),
            describe_calls: AtomicUsize::new(0),
        }
    }

    /// Return these bytes for every image request.
    pub fn with_image_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.image.bytes = bytes.into();
        self
    }

    /// Return this text for every describe request.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Fail every request with a provider error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.image_failure = Some(message.clone());
        self.describe_failure = Some(message);
        self
    }

    /// Fail only describe requests.
    pub fn failing_describe(mut self, message: impl Into<String>) -> Self {
        self.describe_failure = Some(message.into());
        self
    }

    /// Image requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of describe requests received so far.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<GeneratedImage> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.image_failure {
            Some(message) => Err(GenerationError::api(500, message.clone())),
            None => Ok(self.image.clone()),
        }
    }

    async fn describe_image(
        &self,
        _prompt: &str,
        _image: &[u8],
        _mime_type: &str,
    ) -> GenerationResult<String> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        match &self.describe_failure {
            Some(message) => Err(GenerationError::api(500, message.clone())),
            None => Ok(self.description.clone()),
        }
    }
}
