//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport, one MCP session per accepted connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

#[cfg(feature = "tcp")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            Self::Tcp(TcpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or tcp");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// The `host:port` bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects the transport (`stdio` or `tcp`). Unknown or
    /// disabled transports log a warning and fall back to the default.
    pub fn from_env() -> Self {
        let selected = std::env::var("MCP_TRANSPORT").unwrap_or_default();
        Self::select(&selected, |key| std::env::var(key).ok())
    }

    /// Resolve a transport name, reading any extra settings through `lookup`.
    #[cfg_attr(not(feature = "tcp"), allow(unused_variables))]
    fn select(name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" => Self::default(),
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "tcp")]
            "tcp" => {
                let defaults = TcpConfig::default();
                let port = match lookup("MCP_TCP_PORT") {
                    Some(raw) => raw.parse().unwrap_or_else(|_| {
                        warn!("Ignoring invalid MCP_TCP_PORT '{}'", raw);
                        defaults.port
                    }),
                    None => defaults.port,
                };
                let host = lookup("MCP_TCP_HOST").unwrap_or(defaults.host);
                Self::Tcp(TcpConfig { port, host })
            }
            other => {
                let fallback = Self::default();
                warn!(
                    "Transport '{}' is unknown or not compiled in, using {}",
                    other,
                    fallback.description()
                );
                fallback
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}", cfg.address()),
        }
    }
}
