//! Error types for image construction and I/O.

use thiserror::Error;

/// Errors that can occur while building, reading, or writing an [`Image`](crate::Image).
#[derive(Debug, Error)]
pub enum ImageError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a valid `FileDescriptorSet`.
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A file descriptor has no name.
    #[error("image file at index {0} has an empty path")]
    EmptyPath(usize),

    /// Two files in the image share a path.
    #[error("duplicate file in image: {0}")]
    DuplicateFile(String),

    /// A file imports a path that is not a member of the image.
    #[error("{file} imports {import}, which is not in the image")]
    MissingImport {
        /// Importing file.
        file: String,
        /// Import that could not be found.
        import: String,
    },
}

/// Convenience alias for results with [`ImageError`].
pub type Result<T> = std::result::Result<T, ImageError>;
