//! MCP Server implementation.
//!
//! [`McpServer`] answers the three request kinds a session carries:
//! initialize (via [`ServerHandler::get_info`]), `tools/list` and
//! `tools/call`. Listing reads the registry; calling goes through the
//! [`ToolInvoker`], so nothing here knows about individual tools.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::generation::GenerativeBackend;
use crate::domains::tools::{InvocationResult, ToolContext, ToolInvoker, ToolRegistry};

/// The main MCP server handler.
///
/// Cheap to clone; every clone shares the same registry and context, which
/// is how the TCP transport serves many sessions at once.
#[derive(Clone, Debug)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatches tool calls against the registry.
    invoker: Arc<ToolInvoker>,
}

impl McpServer {
    /// Create a server backed by the hosted generation API.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let context = ToolContext::from_config(config.clone())?;
        Self::build(config, context)
    }

    /// Create a server around an explicit generation backend.
    pub fn with_backend(config: Config, backend: Arc<dyn GenerativeBackend>) -> Result<Self> {
        let config = Arc::new(config);
        let context = ToolContext::new(config.clone(), backend);
        Self::build(config, context)
    }

    fn build(config: Arc<Config>, context: ToolContext) -> Result<Self> {
        let registry = ToolRegistry::with_defaults()?;
        info!(
            "Registered {} tools: {:?}",
            registry.len(),
            registry.tool_names()
        );

        let invoker = ToolInvoker::new(Arc::new(registry), Arc::new(context));
        Ok(Self {
            config,
            invoker: Arc::new(invoker),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The registry backing `tools/list`.
    pub fn registry(&self) -> &ToolRegistry {
        self.invoker.registry()
    }

    /// MCP tool models for every registered tool, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry().to_tools()
    }

    /// Invoke a tool without going through a transport.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> InvocationResult {
        self.invoker.invoke(name, arguments).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Holiday card studio. Use generate_holiday_scene, generate_sweater_pattern, \
                 generate_wearing_sweater and generate_final_photo in that order to build a \
                 holiday photo; add and multiply are available for arithmetic."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let name = request.name.to_string();
        self.invoke(&name, request.arguments)
            .await
            .into_call_result(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::generation::FakeBackend;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::with_backend(Config::default(), Arc::new(FakeBackend::new())).unwrap()
    }

    #[test]
    fn test_tools_in_registration_order() {
        let names: Vec<String> = server().tools().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "add",
                "multiply",
                "generate_holiday_scene",
                "generate_sweater_pattern",
                "generate_wearing_sweater",
                "generate_final_photo",
            ]
        );
    }

    #[test]
    fn test_info_advertises_tools_only() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "holidays");
    }

    #[tokio::test]
    async fn test_invoke_add() {
        let result = server()
            .invoke("add", json!({"a": 5, "b": 3}).as_object().cloned())
            .await;
        assert_eq!(result.text().as_deref(), Some("8"));
    }
}
