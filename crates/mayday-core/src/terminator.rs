//! Process termination hook
//!
//! The interceptor only reports that the process should end; the
//! [`Terminator`] decides what ending means.

use std::fmt::Debug;

/// Ends the process after a policy with a nonzero exit code fired
pub trait Terminator: Debug + Send + Sync {
    /// Terminate with `code`
    ///
    /// Implementations may return, in which case the caller continues with
    /// the substitute result.
    fn terminate(&self, code: i32);
}

/// Exits the process immediately
///
/// Other threads get no cancellation signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        tracing::warn!(code, "terminating after intercepted failure");
        std::process::exit(code);
    }
}
