//! Declared parameter schemas for tools.
//!
//! Every tool declares an ordered list of [`ParamSpec`]s. The list is checked
//! once when the tool is registered and used on every call to validate and
//! coerce the incoming argument bag into [`ToolArguments`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::error::ToolError;
use crate::domains::generation::GeneratedArtifact;

// ============================================================================
// Parameter Types
// ============================================================================

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Whether `value` already has exactly this type (no coercion).
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }

    /// Coerce `value` into this type.
    ///
    /// Only primitive conversions are attempted: numeric and boolean strings
    /// parse into numbers and booleans, numbers and booleans render into
    /// strings, and integral floats narrow into integers. Arrays, objects and
    /// `null` never coerce.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::String, Value::String(_)) => Some(value.clone()),
            (Self::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (Self::Number, Value::Number(_)) => Some(value.clone()),
            (Self::Number, Value::String(s)) => parse_number(s.trim()).map(Value::Number),

            (Self::Integer, Value::Number(n)) => integral(n).map(Value::Number),
            (Self::Integer, Value::String(s)) => {
                parse_number(s.trim()).and_then(|n| integral(&n)).map(Value::Number)
            }

            (Self::Boolean, Value::Bool(_)) => Some(value.clone()),
            (Self::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_type())
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(u.into());
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn integral(n: &Number) -> Option<Number> {
    if n.is_i64() || n.is_u64() {
        return Some(n.clone());
    }
    let f = n.as_f64()?;
    // i64::MAX and u64::MAX round up to 2^63 and 2^64 as f64, so the upper bounds are exclusive
    if f.fract() != 0.0 {
        None
    } else if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some((f as i64).into())
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some((f as u64).into())
    } else {
        None
    }
}

/// Short name of a JSON value's type, for error messages.
fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

// ============================================================================
// Parameter Declarations
// ============================================================================

/// One declared parameter of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    /// A parameter that must be supplied by the caller.
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            default: None,
            description: None,
        }
    }

    /// A parameter that may be omitted.
    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    /// Make the parameter optional with a default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }

    /// Attach a human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = serde_json::json!({ "type": self.param_type.json_type() });
        if let Some(description) = &self.description {
            schema["description"] = Value::String(description.clone());
        }
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

/// What a tool hands back on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// A single text content part.
    Text,
    /// A text part naming a saved image file, plus structured artifact metadata.
    ImageArtifact,
}

// ============================================================================
// Tool Descriptor
// ============================================================================

/// Immutable description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
    pub returns: ReturnKind,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns: ReturnKind::Text,
        }
    }

    /// Append a parameter declaration.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Set the return kind.
    pub fn returns(mut self, kind: ReturnKind) -> Self {
        self.returns = kind;
        self
    }

    /// Look up a declared parameter.
    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check the declaration for internal consistency.
    ///
    /// Called by the registry before a tool is accepted.
    pub fn check(&self) -> Result<(), ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::invalid_schema(&self.name, "tool name is empty"));
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(ToolError::invalid_schema(
                    &self.name,
                    format!("parameter '{}' declared twice", param.name),
                ));
            }
            if let Some(default) = &param.default {
                if param.required {
                    return Err(ToolError::invalid_schema(
                        &self.name,
                        format!("parameter '{}' is required but has a default", param.name),
                    ));
                }
                if !param.param_type.matches(default) {
                    return Err(ToolError::invalid_schema(
                        &self.name,
                        format!(
                            "default for '{}' is not a {}",
                            param.name, param.param_type
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the JSON Schema object advertised as the tool's `inputSchema`.
    pub fn input_schema(&self) -> JsonObject {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<Value> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| Value::String(p.name.clone()))
            .collect();

        let mut schema = JsonObject::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema.insert("additionalProperties".into(), Value::Bool(false));
        schema
    }

    /// Create the MCP `Tool` model advertised to clients.
    pub fn to_tool(&self) -> Tool {
        let output_schema = match self.returns {
            ReturnKind::Text => None,
            ReturnKind::ImageArtifact => Some(cached_schema_for_type::<GeneratedArtifact>()),
        };

        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Validate an argument bag against the declared parameters.
    ///
    /// Unknown keys are rejected, `null` on an optional parameter counts as
    /// absent, defaults fill absent optional parameters, and every present
    /// value is coerced to its declared type.
    pub fn validate(&self, arguments: Option<JsonObject>) -> Result<ToolArguments, ToolError> {
        let arguments = arguments.unwrap_or_default();

        if let Some(unknown) = arguments.keys().find(|k| self.parameter(k).is_none()) {
            return Err(ToolError::unknown_argument(&self.name, unknown.as_str()));
        }

        let mut validated = JsonObject::new();
        for param in &self.parameters {
            match arguments.get(&param.name) {
                Some(Value::Null) | None => {
                    if param.required {
                        return Err(ToolError::missing_argument(&self.name, &param.name));
                    }
                    if let Some(default) = &param.default {
                        validated.insert(param.name.clone(), default.clone());
                    }
                }
                Some(value) => {
                    let coerced = param.param_type.coerce(value).ok_or_else(|| {
                        ToolError::InvalidArgumentType {
                            tool: self.name.clone(),
                            argument: param.name.clone(),
                            expected: param.param_type,
                            actual: describe_value(value),
                        }
                    })?;
                    validated.insert(param.name.clone(), coerced);
                }
            }
        }

        Ok(ToolArguments(validated))
    }
}

// ============================================================================
// Validated Arguments
// ============================================================================

/// An argument bag that has passed schema validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(JsonObject);

impl ToolArguments {
    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Decode into a typed parameter struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ToolError::execution_failed(format!("Failed to decode arguments: {}", e)))
    }
}
