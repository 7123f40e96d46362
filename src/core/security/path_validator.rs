use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Symlink '{path}' is not allowed")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validates that a given path is within the configured security boundaries.
///
/// 1. The path must exist.
/// 2. If it is a symlink and symlinks are disallowed, it is rejected.
/// 3. The canonical path (symlinks resolved) must lie under the root, when a
///    root is configured.
///
/// Returns the canonical path on success.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let photo = validate_path("/home/user/uploads/me.jpg", &config.security)?;
/// ```
pub fn validate_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);

    // symlink_metadata does not follow links, so dangling links still count as present
    let metadata = path.symlink_metadata().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })?;
    let is_symlink = metadata.file_type().is_symlink();

    if is_symlink && !security.allow_symlinks {
        return Err(PathSecurityError::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }

    let canonical_path = canonicalize_path(path)?;

    let Some(ref root) = security.root_path else {
        return Ok(canonical_path);
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    if !is_within_root(&canonical_path, &canonical_root) {
        if is_symlink {
            return Err(PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            });
        }
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

fn canonicalize_path(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
