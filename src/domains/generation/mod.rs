//! Generation domain module.
//!
//! Everything that talks to the hosted text/image models and persists what
//! they produce:
//!
//! - `backend.rs` - the [`GenerativeBackend`] trait tools call through
//! - `client.rs` - [`GeminiClient`], the reqwest implementation against the
//!   Google Generative Language API
//! - `artifacts.rs` - [`ArtifactStore`], writes generated images to disk
//! - `fake.rs` - [`FakeBackend`], a scripted in-process backend
//! - `types.rs` - request and response types

mod artifacts;
mod backend;
mod client;
mod error;
pub mod fake;
mod types;

pub use artifacts::{ArtifactStore, GeneratedArtifact};
pub use backend::GenerativeBackend;
pub use client::GeminiClient;
pub use error::{GenerationError, GenerationResult};
pub use fake::FakeBackend;
pub use types::{AspectRatio, GeneratedImage, ImageRequest};
