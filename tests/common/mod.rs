use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmcp::ServiceExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use holiday_mcp_server::client::Session;
use holiday_mcp_server::core::{Config, McpServer};
use holiday_mcp_server::domains::generation::{
    GeneratedImage, GenerationResult, GenerativeBackend, ImageRequest,
};

/// A server running in-process, connected to a client session over a duplex pipe.
#[allow(dead_code)]
pub struct InMemoryServer {
    pub session: Session,
    pub output_dir: TempDir,
    pub server_task: JoinHandle<()>,
}

/// Start a server with `backend` and connect a session to it.
///
/// Artifacts go to a fresh temp directory; `configure` may adjust the
/// config further before the server is built.
#[allow(dead_code)]
pub async fn start_in_memory(
    backend: Arc<dyn GenerativeBackend>,
    configure: impl FnOnce(&mut Config),
) -> InMemoryServer {
    let output_dir = TempDir::new().expect("failed to create tempdir");
    let mut config = Config::default();
    config.artifacts.output_dir = output_dir.path().to_path_buf();
    configure(&mut config);

    let server = McpServer::with_backend(config, backend).expect("failed to build server");
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);

    let server_task = tokio::spawn(async move {
        if let Ok(service) = server.serve(server_io).await {
            let _ = service.waiting().await;
        }
    });

    let session = Session::connect_io(client_io)
        .await
        .expect("handshake failed");

    InMemoryServer {
        session,
        output_dir,
        server_task,
    }
}

/// Backend whose image requests never finish in reasonable time.
#[allow(dead_code)]
pub struct StalledBackend {
    pub delay: Duration,
}

#[async_trait]
impl GenerativeBackend for StalledBackend {
    async fn generate_image(&self, _request: &ImageRequest) -> GenerationResult<GeneratedImage> {
        tokio::time::sleep(self.delay).await;
        Ok(GeneratedImage {
            bytes: b"late".to_vec(),
            mime_type: "image/png".to_string(),
        })
    }

    async fn describe_image(
        &self,
        _prompt: &str,
        _image: &[u8],
        _mime_type: &str,
    ) -> GenerationResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("a patient person".to_string())
    }
}
