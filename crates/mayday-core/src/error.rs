//! Error types for interception setup

use thiserror::Error;

/// Errors raised while configuring interception
///
/// Failures of guarded operations never surface here; they are absorbed by
/// the interceptor.
#[derive(Debug, Error)]
pub enum InterceptError {
    /// The capability declares no guardable operations
    #[error("capability `{capability}` exposes no operations to guard")]
    NoCapability {
        /// Capability name
        capability: &'static str,
    },

    /// A policy names an operation the capability does not expose
    #[error("operation `{operation}` is not part of capability `{capability}`")]
    UnknownOperation {
        /// Capability name
        capability: &'static str,
        /// Offending operation name
        operation: String,
    },

    /// Policy table document could not be parsed
    #[error("invalid policy table: {0}")]
    InvalidPolicyTable(#[from] serde_yaml::Error),
}

impl InterceptError {
    /// Create unknown operation error
    pub fn unknown_operation(capability: &'static str, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            capability,
            operation: operation.into(),
        }
    }
}

/// Result type for interception setup
pub type InterceptResult<T> = Result<T, InterceptError>;
