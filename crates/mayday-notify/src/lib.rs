//! Mayday Notify
//!
//! Renders the "well, this is embarrassing" notices and writes them to an
//! [`OutputSink`].
//!
//! # Example
//!
//! ```rust
//! use mayday_identity::ApplicationIdentity;
//! use mayday_notify::{BufferSink, ConsoleNotifier, Notify};
//! use std::sync::Arc;
//!
//! let buffer = Arc::new(BufferSink::new());
//! let notifier = ConsoleNotifier::new().with_sink(buffer.clone());
//! let identity = ApplicationIdentity::new("Demo", "1.0.0");
//!
//! notifier.notify_with_report(&identity, "", None);
//! assert!(buffer.contents().contains("Demo had a problem and crashed"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod notifier;
pub mod render;
pub mod sink;

pub use notifier::{emit_trace, ConsoleNotifier, Notify};
pub use render::{
    is_custom_message, render_error, render_trace, render_with_report, DEFAULT_MESSAGE,
};
pub use sink::{BufferSink, OutputSink, StderrSink, TracingSink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
