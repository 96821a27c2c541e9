//! Error types for the transfer engine.
//!
//! The primary error type is `EngineError`. Precondition violations and
//! backend OS failures propagate to the caller unmodified; cancellation is
//! NOT an error and is reported as a `false` transfer result instead.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors that can prevent or abort a transfer.
///
/// `InvalidArgument`, `SourceNotFound` and `DestinationExists` are raised
/// synchronously before the backend is invoked. `OsFailure` wraps an
/// unexpected I/O error from the backend's transfer mechanism.
#[derive(Debug)]
pub enum EngineError {
    /// A top-level string argument was empty or blank
    InvalidArgument { reason: String },

    /// Source path does not reference an existing file
    SourceNotFound { path: PathBuf },

    /// Destination already exists and overwriting is disabled
    DestinationExists { path: PathBuf },

    /// The transfer mechanism failed for a reason other than cancellation
    OsFailure { path: PathBuf, source: io::Error },

    /// Catch-all for unexpected errors (e.g. worker thread failure)
    Unknown { message: String },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => {
                write!(f, "Invalid argument: {}", reason)
            }
            Self::SourceNotFound { path } => {
                write!(f, "Source file not found: {}", path.display())
            }
            Self::DestinationExists { path } => {
                write!(
                    f,
                    "Destination file already exists and overwriting is disabled: {}",
                    path.display()
                )
            }
            Self::OsFailure { path, source } => {
                write!(f, "Transfer failed for {}: {}", path.display(), source)
            }
            Self::Unknown { message } => {
                write!(f, "Engine error: {}", message)
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OsFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::OsFailure { source, .. } => source.raw_os_error().map(|e| e as u32),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::Unknown {
            message: err.to_string(),
        }
    }
}
