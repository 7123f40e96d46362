//! Tools domain module.
//!
//! Tools are named, schema-described callables exposed to MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Declared parameter schemas, validation and coercion
//! - `registry.rs` - Append-only registry, the single source of truth for `list_tools`
//! - `invoker.rs` - Lookup, validation, timeout and failure isolation for one call
//! - `context.rs` - Explicit execution context handed to every tool
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a `descriptor()` and a
//!    [`ToolHandler`] impl
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in [`ToolRegistry::with_defaults`]

mod context;
pub mod definitions;
mod error;
mod handlers;
mod invoker;
mod registry;
mod schema;

pub use context::ToolContext;
pub use error::{ToolError, ToolErrorKind};
pub use handlers::{ToolHandler, ToolOutput};
pub use invoker::{InvocationResult, ToolInvoker};
pub use registry::{RegisteredTool, ToolRegistry};
pub use schema::{ParamSpec, ParamType, ReturnKind, ToolArguments, ToolDescriptor};
