//! Interception policies
//!
//! A policy is declared per guarded operation and never changes at runtime.
//! Tables of policies can be written in YAML:
//!
//! ```text
//! charge:
//!   message: "Payment could not be processed"
//!   exit_code: 2
//! refresh_cache:
//!   create_report: false
//!   silent: true
//! ```

use crate::error::InterceptResult;
use indexmap::IndexMap;
use mayday_notify::DEFAULT_MESSAGE;
use serde::{Deserialize, Serialize};

/// How a failing operation is handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterceptPolicy {
    /// Custom notice text; empty selects the default message
    pub message: String,
    /// Write the raw failure trace to the diagnostic sink
    pub print_raw_trace: bool,
    /// Build and persist a crash report
    pub create_report: bool,
    /// Terminate with this code after handling; 0 keeps running
    pub exit_code: i32,
    /// Suppress user-facing notices (reports are still written)
    pub silent: bool,
}

impl InterceptPolicy {
    /// Default policy: report, notify, keep running
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With custom notice text
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// With raw trace output toggled
    #[inline]
    #[must_use]
    pub fn with_raw_trace(mut self, enabled: bool) -> Self {
        self.print_raw_trace = enabled;
        self
    }

    /// With report creation toggled
    #[inline]
    #[must_use]
    pub fn with_report(mut self, enabled: bool) -> Self {
        self.create_report = enabled;
        self
    }

    /// With exit code
    #[inline]
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// With notices suppressed
    #[inline]
    #[must_use]
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Message passed to the notifier
    #[must_use]
    pub fn resolved_message(&self) -> &str {
        if self.message.is_empty() {
            DEFAULT_MESSAGE
        } else {
            &self.message
        }
    }

    /// Whether handling ends the process
    #[inline]
    #[must_use]
    pub fn terminates(&self) -> bool {
        self.exit_code != 0
    }
}

impl Default for InterceptPolicy {
    fn default() -> Self {
        Self {
            message: String::new(),
            print_raw_trace: false,
            create_report: true,
            exit_code: 0,
            silent: false,
        }
    }
}

/// Policies keyed by operation name, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTable {
    policies: IndexMap<String, InterceptPolicy>,
}

impl PolicyTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With policy for `operation`
    #[inline]
    #[must_use]
    pub fn guard(mut self, operation: impl Into<String>, policy: InterceptPolicy) -> Self {
        self.insert(operation, policy);
        self
    }

    /// Set policy for `operation`, returning the one it replaces
    pub fn insert(
        &mut self,
        operation: impl Into<String>,
        policy: InterceptPolicy,
    ) -> Option<InterceptPolicy> {
        self.policies.insert(operation.into(), policy)
    }

    /// Parse a YAML mapping of operation name to policy
    ///
    /// # Errors
    /// Returns error if the document is not such a mapping
    pub fn from_yaml(text: &str) -> InterceptResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Policy for `operation`
    #[inline]
    #[must_use]
    pub fn get(&self, operation: &str) -> Option<&InterceptPolicy> {
        self.policies.get(operation)
    }

    /// Whether `operation` is guarded
    #[inline]
    #[must_use]
    pub fn contains(&self, operation: &str) -> bool {
        self.policies.contains_key(operation)
    }

    /// Guarded operation names
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    /// Number of guarded operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether no operation is guarded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
