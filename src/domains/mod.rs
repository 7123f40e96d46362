//! Domain modules.
//!
//! - **tools**: the tool registry, invocation handler and tool definitions
//! - **generation**: hosted image/text model access and artifact storage

pub mod generation;
pub mod tools;
