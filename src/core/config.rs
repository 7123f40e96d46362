//! Configuration management for the MCP server.
//!
//! Every setting has a default; [`Config::from_env`] overlays `MCP_*`
//! environment variables (and a `.env` file, if present) on top.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tool invocation settings.
    pub tools: ToolsConfig,

    /// Hosted model settings.
    pub generation: GenerationConfig,

    /// Where generated images are written.
    pub artifacts: ArtifactsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Tool invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Ceiling on a single tool call, in seconds. `None` or `0` disables it.
    pub call_timeout_secs: Option<u64>,
}

/// Hosted text/image model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model used to describe uploaded photos.
    pub text_model: String,

    /// Model used to generate images.
    pub image_model: String,

    /// Base URL of the Generative Language API, without a trailing slash.
    pub base_url: String,

    /// HTTP request timeout, in seconds.
    pub request_timeout_secs: u64,
}

/// Artifact output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory generated images are written into.
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Optional file that receives a copy of every log line.
    pub file: Option<PathBuf>,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Google AI Studio API key used for Gemini and Imagen.
    pub google_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory uploaded photos must live under.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be followed.
    /// If false, symlinks pointing outside the root are rejected.
    pub allow_symlinks: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "holidays".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: Some(120),
        }
    }
}

impl ToolsConfig {
    /// The call ceiling, if one is configured.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "imagen-4.0-generate-001".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable numeric or boolean values are logged and ignored.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        if let Some(secs) = parse_env::<u64>("MCP_TOOL_TIMEOUT_SECS") {
            config.tools.call_timeout_secs = Some(secs);
        }

        if let Ok(dir) = std::env::var("MCP_OUTPUT_DIR") {
            config.artifacts.output_dir = PathBuf::from(dir);
        }

        if let Ok(model) = std::env::var("MCP_TEXT_MODEL") {
            config.generation.text_model = model;
        }

        if let Ok(model) = std::env::var("MCP_IMAGE_MODEL") {
            config.generation.image_model = model;
        }

        if let Ok(url) = std::env::var("MCP_GENAI_BASE_URL") {
            config.generation.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = parse_env::<u64>("MCP_GENAI_TIMEOUT_SECS") {
            config.generation.request_timeout_secs = secs;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        match std::env::var("GOOGLE_API_KEY") {
            Ok(api_key) if !api_key.is_empty() => {
                config.credentials.google_api_key = Some(api_key);
                info!("Google API key loaded from environment");
            }
            _ => {
                warn!("GOOGLE_API_KEY not set. Image generation tools will fail.");
            }
        }

        // Load security configuration
        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!(
                "Path security enabled: root directory set to {:?}",
                config.security.root_path
            );
        } else {
            warn!("MCP_ROOT_PATH not set - photo paths are not restricted to a root directory.");
        }

        if let Some(allow_symlinks) = parse_env::<bool>("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks;
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        config
    }
}

impl LoggingConfig {
    /// Logging settings alone, so logging can start before the rest of the
    /// configuration is read (and its warnings are not lost).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Ok(file) = std::env::var("MCP_LOG_FILE") {
            logging.file = Some(PathBuf::from(file)).filter(|p| !p.as_os_str().is_empty());
        }
        logging
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generation.text_model, "gemini-2.5-flash");
        assert_eq!(config.generation.image_model, "imagen-4.0-generate-001");
        assert_eq!(config.artifacts.output_dir, PathBuf::from("static"));
        assert_eq!(config.tools.call_timeout(), Some(Duration::from_secs(120)));
        assert!(config.credentials.google_api_key.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_ceiling() {
        let tools = ToolsConfig {
            call_timeout_secs: Some(0),
        };
        assert_eq!(tools.call_timeout(), None);
    }

    #[test]
    fn test_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("GOOGLE_API_KEY", "test_key_12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.google_api_key.as_deref(),
            Some("test_key_12345")
        );
        unsafe {
            std::env::remove_var("GOOGLE_API_KEY");
        }
    }

    #[test]
    fn test_overrides_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_SECS", "5");
            std::env::set_var("MCP_OUTPUT_DIR", "/tmp/holiday-out");
            std::env::set_var("MCP_GENAI_BASE_URL", "http://localhost:9000/");
            std::env::set_var("MCP_GENAI_TIMEOUT_SECS", "not-a-number");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.call_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.artifacts.output_dir, PathBuf::from("/tmp/holiday-out"));
        assert_eq!(config.generation.base_url, "http://localhost:9000");
        assert_eq!(config.generation.request_timeout_secs, 120);
        unsafe {
            std::env::remove_var("MCP_TOOL_TIMEOUT_SECS");
            std::env::remove_var("MCP_OUTPUT_DIR");
            std::env::remove_var("MCP_GENAI_BASE_URL");
            std::env::remove_var("MCP_GENAI_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            google_api_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_FILE", "");
        }
        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "debug");
        assert!(logging.file.is_none());
        assert_eq!(Config::from_env().logging.level, "debug");
        unsafe {
            std::env::remove_var("MCP_LOG_LEVEL");
            std::env::remove_var("MCP_LOG_FILE");
        }
    }

    #[test]
    fn test_startup_warnings_reach_installed_subscriber() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("GOOGLE_API_KEY", "");
            std::env::remove_var("MCP_ROOT_PATH");
        }

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            Config::from_env();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("GOOGLE_API_KEY not set"));
        assert!(output.contains("MCP_ROOT_PATH not set"));
        unsafe {
            std::env::remove_var("GOOGLE_API_KEY");
        }
    }
}
