//! Explicit execution context shared by all tool handlers.

use std::fmt;
use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::generation::{ArtifactStore, GeminiClient, GenerationResult, GenerativeBackend};

/// Everything a tool may touch while running.
///
/// Built once at startup and shared behind an `Arc`; nothing in it is
/// mutated after construction.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    backend: Arc<dyn GenerativeBackend>,
    artifacts: ArtifactStore,
}

impl ToolContext {
    /// Create a context around an explicit generation backend.
    pub fn new(config: Arc<Config>, backend: Arc<dyn GenerativeBackend>) -> Self {
        let artifacts = ArtifactStore::new(config.artifacts.output_dir.clone());
        Self {
            config,
            backend,
            artifacts,
        }
    }

    /// Create a context backed by the hosted Gemini/Imagen API.
    pub fn from_config(config: Arc<Config>) -> GenerationResult<Self> {
        let backend = GeminiClient::new(
            &config.generation,
            config.credentials.google_api_key.clone(),
        )?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &dyn GenerativeBackend {
        self.backend.as_ref()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}
