//! One client-side MCP session.
//!
//! A [`Session`] walks a fixed lifecycle:
//!
//! ```text
//! Unconnected --open--> Initializing --handshake ok--> Ready --close/transport loss--> Closed
//!                                    \--handshake failed--------------------------------^
//! ```
//!
//! `list_tools` and `call` are only accepted in `Ready`. Tool failures leave
//! the session `Ready`; losing the transport moves it to `Closed`, which is
//! terminal.

use std::fmt;
use std::time::Duration;

use rmcp::model::{CallToolRequestParam, CallToolResult, Content, RawContent, Tool};
use rmcp::service::RunningService;
use rmcp::transport::IntoTransport;
use rmcp::{RoleClient, ServiceError, ServiceExt};
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, instrument, warn};

use super::error::ClientError;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Initializing,
    Ready,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconnected => write!(f, "unconnected"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Successful result of a tool call.
#[derive(Debug, Clone)]
pub struct CallOutput {
    pub content: Vec<Content>,
    pub structured: Option<Value>,
}

impl CallOutput {
    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        content_text(&self.content)
    }
}

/// A client-side MCP session.
pub struct Session {
    state: SessionState,
    service: Option<RunningService<RoleClient, ()>>,
    default_timeout: Option<Duration>,
}

impl Session {
    /// A session that has not been connected yet.
    pub fn new() -> Self {
        Self {
            state: SessionState::Unconnected,
            service: None,
            default_timeout: None,
        }
    }

    /// Apply `timeout` to every [`call`](Self::call) made through this session.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Connect over any byte stream, e.g. an in-memory duplex pipe.
    pub async fn connect_io<S>(stream: S) -> Result<Self, ClientError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let mut session = Self::new();
        session.open(stream).await?;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Name the server reported during the handshake.
    pub fn server_name(&self) -> Option<&str> {
        self.service
            .as_ref()
            .and_then(|s| s.peer_info())
            .map(|info| info.server_info.name.as_str())
    }

    /// Run the initialize handshake over `transport`.
    ///
    /// Only valid on an `Unconnected` session. A failed handshake closes it.
    pub async fn open<T, E, A>(&mut self, transport: T) -> Result<(), ClientError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        if self.state != SessionState::Unconnected {
            return Err(ClientError::NotReady(self.state));
        }

        self.state = SessionState::Initializing;
        match ().serve(transport).await {
            Ok(service) => {
                self.service = Some(service);
                self.state = SessionState::Ready;
                info!(
                    "Session ready (server: {})",
                    self.server_name().unwrap_or("unknown")
                );
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Closed;
                warn!("Handshake failed: {}", e);
                Err(ClientError::connect(e))
            }
        }
    }

    /// Tool descriptors advertised by the server, in its order.
    #[instrument(skip(self))]
    pub async fn list_tools(&mut self) -> Result<Vec<Tool>, ClientError> {
        let result = self.ready()?.list_all_tools().await;
        match result {
            Ok(tools) => {
                debug!("Server listed {} tools", tools.len());
                Ok(tools)
            }
            Err(e) => Err(self.service_error("tools/list", e)),
        }
    }

    /// Call a tool, honouring the session's default timeout if one is set.
    pub async fn call(&mut self, name: &str, arguments: Value) -> Result<CallOutput, ClientError> {
        match self.default_timeout {
            Some(limit) => self.call_with_timeout(name, arguments, limit).await,
            None => self.call_once(name, arguments).await,
        }
    }

    /// Call a tool, giving up after `limit`.
    ///
    /// A call abandoned on timeout does not close the session.
    pub async fn call_with_timeout(
        &mut self,
        name: &str,
        arguments: Value,
        limit: Duration,
    ) -> Result<CallOutput, ClientError> {
        match tokio::time::timeout(limit, self.call_once(name, arguments)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Call to {} exceeded {:?}", name, limit);
                Err(ClientError::Timeout {
                    tool: name.to_string(),
                    timeout: Some(limit),
                })
            }
        }
    }

    #[instrument(skip(self, arguments))]
    async fn call_once(&mut self, name: &str, arguments: Value) -> Result<CallOutput, ClientError> {
        let request = call_request(name, arguments)?;
        let result = self.ready()?.call_tool(request).await;
        match result {
            Ok(result) => into_output(name, result),
            Err(e) => Err(self.service_error(name, e)),
        }
    }

    /// Shut the session down. Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.state = SessionState::Closed;
        if let Some(service) = self.service.take() {
            service
                .cancel()
                .await
                .map_err(ClientError::transport_closed)?;
            info!("Session closed");
        }
        Ok(())
    }

    fn ready(&self) -> Result<&RunningService<RoleClient, ()>, ClientError> {
        match (&self.service, self.state) {
            (Some(service), SessionState::Ready) => Ok(service),
            (_, state) => Err(ClientError::NotReady(state)),
        }
    }

    /// Classify a failed request. Anything but a JSON-RPC error reply means
    /// the transport is gone and the session is closed.
    fn service_error(&mut self, tool: &str, err: ServiceError) -> ClientError {
        match err {
            ServiceError::McpError(data) => ClientError::from_rpc_error(tool, &data),
            other => {
                warn!("Transport failure, closing session: {}", other);
                self.state = SessionState::Closed;
                self.service = None;
                ClientError::transport_closed(other)
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("server", &self.server_name())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

fn call_request(name: &str, arguments: Value) -> Result<CallToolRequestParam, ClientError> {
    let request = match arguments {
        Value::Null => json!({ "name": name }),
        Value::Object(map) => json!({ "name": name, "arguments": map }),
        other => {
            return Err(ClientError::Protocol(format!(
                "arguments must be a JSON object, got {}",
                other
            )));
        }
    };
    serde_json::from_value(request).map_err(|e| ClientError::Protocol(e.to_string()))
}

fn into_output(name: &str, result: CallToolResult) -> Result<CallOutput, ClientError> {
    if result.is_error.unwrap_or(false) {
        let kind = result
            .structured_content
            .as_ref()
            .and_then(|v| v.get("kind"))
            .and_then(Value::as_str);
        let message = content_text(&result.content);
        return Err(ClientError::from_tool_failure(name, message, kind));
    }

    Ok(CallOutput {
        content: result.content,
        structured: result.structured_content,
    })
}

fn content_text(content: &[Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
