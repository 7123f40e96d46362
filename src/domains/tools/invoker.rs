//! Tool invocation handler.
//!
//! Looks up a tool, validates the argument bag against its declared schema,
//! runs it under the configured ceiling, and turns every outcome (including
//! panics inside the tool) into an [`InvocationResult`]. Nothing a tool does
//! can tear down the session that called it.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, JsonObject, RawContent};
use tracing::{error, info, instrument, warn};

use super::context::ToolContext;
use super::error::ToolError;
use super::handlers::ToolOutput;
use super::registry::ToolRegistry;

// ============================================================================
// Invocation Result
// ============================================================================

/// The outcome of one tool call: content parts, or an error.
#[derive(Debug, Clone, Default)]
pub struct InvocationResult {
    pub content: Vec<Content>,
    pub structured_content: Option<serde_json::Value>,
    pub error: Option<ToolError>,
}

impl InvocationResult {
    pub fn success(output: ToolOutput) -> Self {
        Self {
            content: output.content,
            structured_content: output.structured,
            error: None,
        }
    }

    pub fn failure(error: ToolError) -> Self {
        Self {
            content: Vec::new(),
            structured_content: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Convert into the MCP wire representation.
    ///
    /// Dispatch errors (unknown tool, bad arguments) become JSON-RPC errors.
    /// Failures of the tool itself stay inside a `CallToolResult` flagged
    /// with `isError`, carrying the kind in `structuredContent`.
    pub fn into_call_result(self, tool: &str) -> Result<CallToolResult, McpError> {
        match self.error {
            None => {
                let mut result = CallToolResult::success(self.content);
                result.structured_content = self.structured_content;
                Ok(result)
            }
            Some(err) if err.is_dispatch_error() => Err(err.to_error_data(tool)),
            Some(err) => {
                let message = err.to_string();
                let mut result = CallToolResult::error(vec![Content::text(message.clone())]);
                result.structured_content = Some(serde_json::json!({
                    "kind": err.kind(),
                    "message": message,
                }));
                Ok(result)
            }
        }
    }
}

// ============================================================================
// Invoker
// ============================================================================

/// Dispatches tool calls against a registry.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    context: Arc<ToolContext>,
    call_timeout: Option<Duration>,
}

impl ToolInvoker {
    /// Create an invoker using the call ceiling from the context's configuration.
    pub fn new(registry: Arc<ToolRegistry>, context: Arc<ToolContext>) -> Self {
        let call_timeout = context.config().tools.call_timeout();
        Self {
            registry,
            context,
            call_timeout,
        }
    }

    /// Override the per-call ceiling (`None` disables it).
    pub fn with_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Invoke a tool by name.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> InvocationResult {
        let Some(tool) = self.registry.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return InvocationResult::failure(ToolError::not_found(name));
        };

        let arguments = match tool.descriptor().validate(arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!("Rejected call: {}", e);
                return InvocationResult::failure(e);
            }
        };

        info!("Invoking tool");
        let call = AssertUnwindSafe(tool.handler().call(arguments, &self.context)).catch_unwind();

        let outcome = match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("Tool exceeded its {:?} ceiling", limit);
                    return InvocationResult::failure(ToolError::Timeout(limit));
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(output)) => InvocationResult::success(output),
            Ok(Err(e)) => {
                warn!("Tool failed: {}", e);
                InvocationResult::failure(into_execution_failure(e))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Tool panicked: {}", message);
                InvocationResult::failure(ToolError::execution_failed(format!(
                    "tool panicked: {}",
                    message
                )))
            }
        }
    }
}

/// Anything a tool function raises is reported as an execution failure.
fn into_execution_failure(err: ToolError) -> ToolError {
    match err {
        ToolError::ExecutionFailed(_) | ToolError::Timeout(_) => err,
        other => ToolError::execution_failed(other.to_string()),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::generation::FakeBackend;
    use crate::domains::tools::error::ToolErrorKind;
    use crate::domains::tools::handlers::ToolHandler;
    use crate::domains::tools::schema::{ParamSpec, ParamType, ToolArguments, ToolDescriptor};
    use serde_json::json;

    struct FailingTool;

    #[async_trait::async_trait]
    impl ToolHandler for FailingTool {
        async fn call(&self, _: ToolArguments, _: &ToolContext) -> Result<ToolOutput, ToolError> {
            Err(ToolError::execution_failed("provider unavailable"))
        }
    }

    struct PanickingTool;

    #[async_trait::async_trait]
    impl ToolHandler for PanickingTool {
        async fn call(&self, _: ToolArguments, _: &ToolContext) -> Result<ToolOutput, ToolError> {
            panic!("kaboom");
        }
    }

    struct SlowTool;

    #[async_trait::async_trait]
    impl ToolHandler for SlowTool {
        async fn call(&self, _: ToolArguments, _: &ToolContext) -> Result<ToolOutput, ToolError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ToolOutput::text("late"))
        }
    }

    struct MisreportingTool;

    #[async_trait::async_trait]
    impl ToolHandler for MisreportingTool {
        async fn call(&self, _: ToolArguments, _: &ToolContext) -> Result<ToolOutput, ToolError> {
            Err(ToolError::not_found("inner"))
        }
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn invoker_with(extra: impl FnOnce(&mut ToolRegistry)) -> ToolInvoker {
        let mut registry = ToolRegistry::with_defaults().unwrap();
        extra(&mut registry);
        let context = ToolContext::new(Arc::new(Config::default()), Arc::new(FakeBackend::new()));
        ToolInvoker::new(Arc::new(registry), Arc::new(context))
    }

    #[tokio::test]
    async fn test_add_and_multiply() {
        let invoker = invoker_with(|_| {});

        let sum = invoker.invoke("add", args(json!({ "a": 5, "b": 3 }))).await;
        assert!(!sum.is_error());
        assert_eq!(sum.text().as_deref(), Some("8"));

        let product = invoker.invoke("multiply", args(json!({ "a": 4, "b": 6 }))).await;
        assert_eq!(product.text().as_deref(), Some("24"));
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let invoker = invoker_with(|_| {});
        let first = invoker.invoke("add", args(json!({ "a": 2.5, "b": "1.5" }))).await;
        let second = invoker.invoke("add", args(json!({ "a": 2.5, "b": "1.5" }))).await;
        assert_eq!(first.text(), second.text());
        assert_eq!(first.text().as_deref(), Some("4.0"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let invoker = invoker_with(|_| {});
        let result = invoker.invoke("subtract", args(json!({ "a": 1, "b": 1 }))).await;
        assert_eq!(result.error.unwrap().kind(), ToolErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let invoker = invoker_with(|_| {});
        let result = invoker.invoke("add", args(json!({ "a": 1 }))).await;
        let err = result.error.unwrap();
        assert_eq!(err.kind(), ToolErrorKind::MissingArgument);
        assert_eq!(err.argument(), Some("b"));
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_and_invoker_stays_usable() {
        let invoker = invoker_with(|r| {
            r.register(ToolDescriptor::new("flaky", "always fails"), FailingTool)
                .unwrap();
        });

        let failed = invoker.invoke("flaky", None).await;
        let err = failed.error.clone().unwrap();
        assert_eq!(err.kind(), ToolErrorKind::ExecutionFailed);
        assert!(err.to_string().contains("provider unavailable"));

        let next = invoker.invoke("add", args(json!({ "a": 1, "b": 2 }))).await;
        assert_eq!(next.text().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let invoker = invoker_with(|r| {
            r.register(ToolDescriptor::new("panics", "panics"), PanickingTool)
                .unwrap();
        });

        let result = invoker.invoke("panics", None).await;
        let err = result.error.unwrap();
        assert_eq!(err.kind(), ToolErrorKind::ExecutionFailed);
        assert!(err.to_string().contains("kaboom"));
    }

    #[tokio::test]
    async fn test_handler_errors_are_execution_failures() {
        let invoker = invoker_with(|r| {
            r.register(ToolDescriptor::new("liar", "misreports"), MisreportingTool)
                .unwrap();
        });

        let result = invoker.invoke("liar", None).await;
        assert_eq!(result.error.unwrap().kind(), ToolErrorKind::ExecutionFailed);
    }

    #[tokio::test]
    async fn test_timeout() {
        let invoker = invoker_with(|r| {
            r.register(ToolDescriptor::new("slow", "sleeps"), SlowTool)
                .unwrap();
        })
        .with_timeout(Some(Duration::from_millis(50)));

        let result = invoker.invoke("slow", None).await;
        assert_eq!(result.error.unwrap().kind(), ToolErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_wire_mapping() {
        let invoker = invoker_with(|r| {
            r.register(
                ToolDescriptor::new("flaky", "always fails")
                    .param(ParamSpec::optional("note", ParamType::String)),
                FailingTool,
            )
            .unwrap();
        });

        let ok = invoker
            .invoke("add", args(json!({ "a": 1, "b": 1 })))
            .await
            .into_call_result("add")
            .unwrap();
        assert_eq!(ok.is_error, Some(false));

        let dispatch = invoker
            .invoke("add", None)
            .await
            .into_call_result("add")
            .unwrap_err();
        assert_eq!(dispatch.data.unwrap()["kind"], "missing_argument");

        let failed = invoker
            .invoke("flaky", None)
            .await
            .into_call_result("flaky")
            .unwrap();
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(failed.structured_content.unwrap()["kind"], "execution_failed");
    }
}
