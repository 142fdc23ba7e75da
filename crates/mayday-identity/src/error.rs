//! Error types for identity sources
//!
//! Source errors never escape [`crate::MetadataResolver::resolve`]; they are
//! logged and the resolver falls through to the next tier.

use std::path::PathBuf;

/// Failure reading a single configuration source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Source file does not exist
    #[error("source not found: {0}")]
    NotFound(PathBuf),

    /// IO error reading the source file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Structured document could not be parsed
    #[error("invalid document {path}: {source}")]
    InvalidYaml {
        /// Document path
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// Properties line could not be parsed
    #[error("invalid properties {path} at line {line}")]
    InvalidProperties {
        /// Properties file path
        path: PathBuf,
        /// One-based line number
        line: usize,
    },
}

impl SourceError {
    /// Create IO error for path, mapping `NotFound` to [`SourceError::NotFound`]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Whether the source was simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified() {
        let err = SourceError::io_error(
            "application.yml",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "source not found: application.yml");
    }

    #[test]
    fn other_io_errors_keep_source() {
        let err = SourceError::io_error(
            "application.yml",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("io error reading application.yml"));
    }
}
