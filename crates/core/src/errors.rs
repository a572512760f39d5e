use std::path::{Path, PathBuf};

/// Result type alias for reclaim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for reclaim operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Open, lock, write, flush, sync or close failed on the underlying file
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The handle was already released or closed
    #[error("cannot {operation} '{path}': resource closed")]
    Closed { path: PathBuf, operation: String },

    /// A cleanup action failed with no caller to report to
    #[error("cleanup of {description} failed: {message}")]
    Cleanup {
        description: String,
        message: String,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a resource closed error
    #[must_use]
    pub fn closed(path: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        Error::Closed {
            path: path.into(),
            operation: operation.into(),
        }
    }

    /// Create a cleanup failure
    #[must_use]
    pub fn cleanup(description: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Cleanup {
            description: description.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the IOFailure kind reported by explicit
    /// open, write and release operations.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Error::FileSystem { .. } | Error::Closed { .. })
    }

    /// Whether the operation was rejected because the handle was already closed
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed { .. })
    }

    /// The underlying OS error kind, if any
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Error::FileSystem { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// The path this error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::FileSystem { path, .. } | Error::Closed { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Extension trait for attaching file context to I/O results
pub trait ResultExt<T> {
    /// Tag an I/O failure with the path and operation that produced it
    fn fs_context(self, path: impl AsRef<Path>, operation: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: impl AsRef<Path>, operation: &str) -> Result<T> {
        self.map_err(|e| Error::file_system(path.as_ref(), operation, e))
    }
}
