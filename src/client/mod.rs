//! MCP client driver.
//!
//! Connects to a holiday server (or any MCP tool server), lists its tools and
//! calls them with typed errors.
//!
//! ```rust,no_run
//! use holiday_mcp_server::client::{ClientDriver, ServerDescriptor};
//! use serde_json::json;
//!
//! # async fn demo() -> Result<(), holiday_mcp_server::client::ClientError> {
//! let mut session = ClientDriver::new()
//!     .connect(&ServerDescriptor::process("holiday_mcp_server"))
//!     .await?;
//! let sum = session.call("add", json!({"a": 5, "b": 3})).await?;
//! assert_eq!(sum.text(), "8");
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod descriptor;
mod error;
mod session;

pub use descriptor::ServerDescriptor;
pub use error::ClientError;
pub use session::{CallOutput, Session, SessionState};

use std::time::Duration;

use rmcp::transport::TokioChildProcess;
use tracing::info;

/// Opens [`Session`]s to servers described by a [`ServerDescriptor`].
///
/// No retries: a failed connection is reported once and left to the caller.
#[derive(Debug, Clone, Default)]
pub struct ClientDriver {
    call_timeout: Option<Duration>,
}

impl ClientDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default ceiling applied to every call made through sessions this driver opens.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Start or reach the server and complete the handshake.
    pub async fn connect(&self, descriptor: &ServerDescriptor) -> Result<Session, ClientError> {
        info!("Connecting to {}", descriptor);
        let mut session = Session::new().with_default_timeout(self.call_timeout);

        match descriptor {
            ServerDescriptor::Process { command, args, env } => {
                let mut cmd = tokio::process::Command::new(command);
                cmd.args(args)
                    .envs(env.iter().map(|(k, v)| (k, v)))
                    .kill_on_drop(true);
                let transport = TokioChildProcess::new(cmd).map_err(ClientError::connect)?;
                session.open(transport).await?;
            }
            #[cfg(feature = "tcp")]
            ServerDescriptor::Tcp { address } => {
                let stream = tokio::net::TcpStream::connect(address)
                    .await
                    .map_err(ClientError::connect)?;
                session.open(stream).await?;
            }
        }

        Ok(session)
    }
}
