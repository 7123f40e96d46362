//! Tool Registry - central registration and lookup for all tools.
//!
//! This module provides:
//! - Append-only registration with schema checks
//! - Ordered listing of tool descriptors (and their MCP `Tool` models)
//! - Lookup by name for the invocation handler

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::{debug, warn};

use super::definitions::{
    AddTool, GenerateFinalPhotoTool, GenerateHolidaySceneTool, GenerateSweaterPatternTool,
    GenerateWearingSweaterTool, MultiplyTool,
};
use super::error::ToolError;
use super::handlers::ToolHandler;
use super::schema::ToolDescriptor;

// ============================================================================
// Registered Tool
// ============================================================================

/// A descriptor paired with the handler that executes it.
#[derive(Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Registration happens once at startup. Tools keep their registration order
/// and names are unique.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    ///
    /// This is the single source of truth for the tools the server exposes.
    pub fn with_defaults() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(AddTool::descriptor(), AddTool)?;
        registry.register(MultiplyTool::descriptor(), MultiplyTool)?;
        registry.register(GenerateHolidaySceneTool::descriptor(), GenerateHolidaySceneTool)?;
        registry.register(GenerateSweaterPatternTool::descriptor(), GenerateSweaterPatternTool)?;
        registry.register(GenerateWearingSweaterTool::descriptor(), GenerateWearingSweaterTool)?;
        registry.register(GenerateFinalPhotoTool::descriptor(), GenerateFinalPhotoTool)?;
        Ok(registry)
    }

    /// Register a tool.
    ///
    /// Fails with [`ToolError::DuplicateTool`] when the name is taken and with
    /// [`ToolError::InvalidSchema`] when the descriptor is inconsistent.
    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H) -> Result<(), ToolError>
    where
        H: ToolHandler + 'static,
    {
        self.register_arc(descriptor, Arc::new(handler))
    }

    /// Register a tool whose handler is already shared.
    pub fn register_arc(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        descriptor.check()?;

        if self.index.contains_key(&descriptor.name) {
            warn!("Rejecting duplicate tool registration: {}", descriptor.name);
            return Err(ToolError::DuplicateTool(descriptor.name));
        }

        debug!("Registering tool: {}", descriptor.name);
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler,
        });
        Ok(())
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor).collect()
    }

    /// All tools as MCP `Tool` models, in registration order.
    pub fn to_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.to_tool()).collect()
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::ToolContext;
    use crate::domains::tools::handlers::ToolOutput;
    use crate::domains::tools::schema::{ParamSpec, ParamType, ToolArguments};

    struct EchoTool;

    #[async_trait::async_trait]
    impl ToolHandler for EchoTool {
        async fn call(
            &self,
            _arguments: ToolArguments,
            _context: &ToolContext,
        ) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::text("echo"))
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::with_defaults().unwrap();
        let names = registry.tool_names();
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
    fn test_registry_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::new("echo", "first"), EchoTool)
            .unwrap();
        let err = registry
            .register(ToolDescriptor::new("echo", "second"), EchoTool)
            .unwrap_err();

        assert!(matches!(err, ToolError::DuplicateTool(ref name) if name == "echo"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().descriptor().description, "first");
    }

    #[test]
    fn test_registry_rejects_invalid_schema() {
        let mut registry = ToolRegistry::new();
        let descriptor = ToolDescriptor::new("echo", "bad")
            .param(ParamSpec::required("x", ParamType::String))
            .param(ParamSpec::required("x", ParamType::String));

        assert!(registry.register(descriptor, EchoTool).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listed_tools_match_lookup() {
        let registry = ToolRegistry::with_defaults().unwrap();
        let tools = registry.to_tools();
        assert_eq!(tools.len(), registry.len());
        for tool in tools {
            assert!(registry.contains(&tool.name));
        }
        assert!(registry.get("subtract").is_none());
    }
}
