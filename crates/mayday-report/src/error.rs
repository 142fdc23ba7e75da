//! Error types for report persistence
//!
//! [`crate::Reporter::persist`] logs these and returns `None`; only
//! [`crate::CrashReporter::try_persist`] hands them to the caller.

use std::path::PathBuf;

/// Errors while writing a crash report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report directory could not be created
    #[error("cannot create report directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO error writing the report file
    #[error("io error writing {path}: {source}")]
    Write {
        /// Report file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Report could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Every candidate file name for this second is taken
    #[error("no free report name for {stem} in {dir} after {attempts} attempts")]
    NamesExhausted {
        /// Report directory
        dir: PathBuf,
        /// File name stem for the current second
        stem: String,
        /// Candidate names tried
        attempts: usize,
    },
}

impl ReportError {
    /// Create write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;
