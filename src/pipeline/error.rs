//! Error types for pipeline operations.
//!
//! All pipeline stages share this error type. Context helpers attach the
//! failing operation and path to io errors so that a failed run names the
//! exact file or tool involved.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type covering every pipeline stage.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error with a descriptive message
    #[error("{0}")]
    GenericError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// An external command could not be spawned
    #[error("Failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to spawn
        command: String,
        /// Underlying io error
        error: std::io::Error,
    },

    /// Host JDK does not match the required major version
    #[error("JDK {required} required, found {found}")]
    ToolchainMismatch {
        /// Required major version
        required: u32,
        /// Version reported by javac
        found: String,
    },

    /// Operator declined a confirmation gate
    #[error("Aborted by operator: {0}")]
    OperatorAborted(String),

    /// Downloaded archive hash does not match the recorded value
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// File that failed verification
        path: PathBuf,
        /// Hash recorded in the static table
        expected: String,
        /// Hash computed over the download
        actual: String,
    },

    /// jpackage executable was not found in the extracted JDK
    #[error("jpackage executable not found under {0}")]
    PackagingToolMissing(PathBuf),

    /// Remote notarization reported a terminal failure
    #[error("Notarization failed: {0}")]
    NotarizationFailed(String),

    /// Notarization polling exhausted its attempt bound
    #[error("Notarization still pending after {attempts} status checks")]
    NotarizationTimeout {
        /// Number of status checks performed
        attempts: u32,
    },
}

/// Adds a message to `Option` and `Result` values, converting to [`Error`].
pub trait Context<T> {
    /// Wraps the error with a static message.
    fn context(self, msg: &str) -> Result<T>;

    /// Wraps the error with a lazily-built message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", f(), e)))
    }
}

/// Attaches the attempted filesystem operation and path to io errors.
pub trait ErrorExt<T> {
    /// Maps an io error to [`Error::GenericError`] naming `action` and `path`.
    fn fs_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|e| {
            Error::GenericError(format!("{} ({}): {}", action, path.display(), e))
        })
    }
}
