//! Mayday Report
//!
//! Structured crash reports for intercepted failures.
//!
//! # Architecture
//!
//! ```text
//! Failure + CallSite + ApplicationIdentity → CrashReport::build → CrashReporter::persist → crash-<ts>.json
//!                                                   ↑
//!                                            SystemInfo::collect
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mayday_report::{CrashReporter, Failure, ReportConfig, Reporter};
//!
//! let reporter = CrashReporter::new(ReportConfig::new());
//! let failure = Failure::new("io", Some("disk full".into())).capture_backtrace();
//! let report = reporter.build(&identity, &failure, None);
//! if let Some(path) = reporter.persist(&report) {
//!     println!("report at {}", path.display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod backtrace;
pub mod error;
pub mod failure;
pub mod report;
pub mod reporter;
pub mod system;

pub use backtrace::{parse_frames, StackFrame};
pub use error::{ReportError, ReportResult};
pub use failure::{CallSite, Failure, PANIC_KIND};
pub use report::CrashReport;
pub use reporter::{CrashReporter, ReportConfig, Reporter, REPORT_DIR_ENV, REPORT_PREFIX};
pub use system::SystemInfo;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
