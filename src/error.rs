//! Error handling module for bootcraft
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every failure carries the document path or selection name it concerns, so
//! the CLI can report it without extra context.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::SetKind;

/// Main error type for bootcraft
#[derive(Error, Debug)]
pub enum BootcraftError {
    /// A requested package set, store or blueprint does not exist
    #[error("{kind} '{name}' not found in {}", location.display())]
    NotFound {
        kind: String,
        name: String,
        location: PathBuf,
    },

    /// A document does not have the expected shape
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Both a window manager and a desktop environment were requested
    #[error(
        "Conflicting desktop selection: window manager '{window_manager}' and desktop environment '{desktop_environment}' cannot both be set"
    )]
    ConflictingSelection {
        window_manager: String,
        desktop_environment: String,
    },

    /// No distro profile exists for the requested image type
    #[error("Unsupported image type '{0}': no matching distro profile")]
    UnsupportedDistro(String),

    /// IO errors (reading documents, writing outputs)
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for bootcraft operations
pub type Result<T> = std::result::Result<T, BootcraftError>;

// Convenient error constructors
impl BootcraftError {
    /// Create a not-found error for a package set of the given kind
    pub fn set_not_found(kind: SetKind, name: impl Into<String>, location: &Path) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.into(),
            location: location.to_path_buf(),
        }
    }

    /// Create a not-found error for anything that is not a package set
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>, location: &Path) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
            location: location.to_path_buf(),
        }
    }

    /// Create a parse error
    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an IO error bound to a path
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error came from a malformed document
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Whether this error came from a missing selection or document
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
