// Security module for path validation
//
// Uploaded photo paths are checked against the configured root directory
// before they are read, preventing path traversal outside it.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_path};
