//! Failure and call-site descriptors
//!
//! A [`Failure`] is the normalised form of whatever went wrong inside a
//! guarded operation: an `Err` value or an unwinding panic.

use crate::backtrace::{parse_frames, StackFrame};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

/// Kind recorded for unwinding panics
pub const PANIC_KIND: &str = "panic";

/// Normalised failure of a guarded operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: String,
    message: Option<String>,
    frames: Vec<StackFrame>,
    trace: Option<String>,
}

impl Failure {
    /// Failure with explicit kind and message, no backtrace
    #[must_use]
    pub fn new(kind: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.filter(|m| !m.is_empty()),
            frames: Vec::new(),
            trace: None,
        }
    }

    /// Failure from an error value; the kind is the error's type name
    #[must_use]
    pub fn from_error<E: fmt::Display + ?Sized + 'static>(error: &E) -> Self {
        Self::new(std::any::type_name::<E>(), Some(error.to_string()))
    }

    /// Failure from a panic payload
    ///
    /// String payloads become the message; other payloads leave it empty.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Self::new(PANIC_KIND, message)
    }

    /// Attach a captured backtrace
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        if backtrace.status() == BacktraceStatus::Captured {
            let rendered = backtrace.to_string();
            self.frames = parse_frames(&rendered);
            self.trace = Some(rendered);
        }
        self
    }

    /// Attach a backtrace captured at the current point
    ///
    /// Captured regardless of `RUST_BACKTRACE`.
    #[must_use]
    pub fn capture_backtrace(self) -> Self {
        self.with_backtrace(&Backtrace::force_capture())
    }

    /// Attach already parsed frames
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Fully qualified kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Kind without module path or generic arguments
    #[must_use]
    pub fn short_kind(&self) -> &str {
        let base = self.kind.split('<').next().unwrap_or(&self.kind);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Failure message, if any
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Parsed backtrace frames, empty when none was captured
    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Report cause line: `<kind>: <message>`
    #[must_use]
    pub fn cause(&self) -> String {
        format!("{}: {}", self.kind, self.message().unwrap_or("No message"))
    }

    /// Raw trace for diagnostic output
    #[must_use]
    pub fn trace_text(&self) -> String {
        let mut text = match self.message() {
            Some(message) => format!("{}: {message}", self.kind),
            None => self.kind.clone(),
        };
        if let Some(trace) = &self.trace {
            text.push('\n');
            text.push_str(trace.trim_end());
        }
        text
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cause())
    }
}

/// Where a guarded operation lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    /// Owning module or type
    #[serde(rename = "class")]
    pub owner: String,
    /// Operation name
    #[serde(rename = "method")]
    pub operation: String,
}

impl CallSite {
    /// Create call site
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.operation)
    }
}

/// Call site in the current module: `call_site!("load_config")`
#[macro_export]
macro_rules! call_site {
    ($operation:expr) => {
        $crate::CallSite::new(module_path!(), $operation)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DiskFull;

    impl fmt::Display for DiskFull {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("no space left")
        }
    }

    #[test]
    fn error_kind_is_type_name() {
        let failure = Failure::from_error(&DiskFull);
        assert!(failure.kind().ends_with("DiskFull"));
        assert_eq!(failure.short_kind(), "DiskFull");
        assert_eq!(failure.message(), Some("no space left"));
        assert!(failure.cause().ends_with("DiskFull: no space left"));
    }

    #[test]
    fn short_kind_strips_generics() {
        let failure = Failure::new("alloc::boxed::Box<dyn core::error::Error>", None);
        assert_eq!(failure.short_kind(), "Box");
    }

    #[test]
    fn panic_payloads() {
        let failure = Failure::from_panic(&"boom");
        assert_eq!(failure.kind(), PANIC_KIND);
        assert_eq!(failure.message(), Some("boom"));

        let failure = Failure::from_panic(&String::from("owned"));
        assert_eq!(failure.message(), Some("owned"));

        let failure = Failure::from_panic(&42_u32);
        assert_eq!(failure.message(), None);
        assert_eq!(failure.cause(), "panic: No message");
    }

    #[test]
    fn empty_message_is_none() {
        let failure = Failure::new("Empty", Some(String::new()));
        assert_eq!(failure.message(), None);
        assert_eq!(failure.trace_text(), "Empty");
    }

    #[test]
    fn captured_backtrace_yields_frames() {
        let failure = Failure::new("Traced", Some("x".into())).capture_backtrace();
        assert!(!failure.frames().is_empty());
        assert!(failure.trace_text().starts_with("Traced: x\n"));
    }

    #[test]
    fn disabled_backtrace_leaves_frames_empty() {
        let failure = Failure::new("Quiet", None).with_backtrace(&Backtrace::disabled());
        assert!(failure.frames().is_empty());
        assert_eq!(failure.trace_text(), "Quiet");
    }

    #[test]
    fn call_site_macro_uses_module_path() {
        let site = crate::call_site!("load");
        assert_eq!(site.owner, module_path!());
        assert_eq!(site.operation, "load");
        assert_eq!(site.to_string(), format!("{}::load", module_path!()));
    }
}
