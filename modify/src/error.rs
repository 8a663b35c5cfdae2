//! Error types for option modification.
//!
//! Construction problems surface as [`ModifyError::Configuration`] and are
//! never retried. Per-file failures surface as [`ModifyError::FileEdit`] and
//! abort the running modifier. A file without source code info is never an
//! error.

use protomod_image::ImageError;
use thiserror::Error;

/// Errors that can occur while configuring or running modifiers.
#[derive(Debug, Error)]
pub enum ModifyError {
    /// Invalid modifier arguments, detected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An option value could not be written to a file.
    #[error("cannot modify {path}: {reason}")]
    FileEdit {
        /// Path of the file being edited.
        path: String,
        /// Why the edit was rejected.
        reason: String,
    },

    /// Image construction or image I/O failure.
    #[error("image error: {0}")]
    Image(#[from] ImageError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ModifyError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn file_edit(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileEdit {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results with [`ModifyError`].
pub type Result<T> = std::result::Result<T, ModifyError>;
