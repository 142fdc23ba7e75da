//! Mayday Core
//!
//! Friendly crash handling: guarded operations whose failures become a
//! crash report on disk, a plain-language notice for the user, and a
//! default value for the caller.
//!
//! # Architecture
//!
//! ```text
//! Interceptor ──▶ IdentityCell (mayday-identity)
//!      │     ──▶ Reporter     (mayday-report)
//!      │     ──▶ Notify       (mayday-notify)
//!      │     ──▶ Terminator
//!      ▲
//! Guarded<S: Capability> + PolicyTable
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use mayday_core::{InterceptPolicy, Interceptor};
//! use mayday_report::call_site;
//!
//! let interceptor = Interceptor::builder().build();
//! let policy = InterceptPolicy::new().with_message("Could not load settings");
//!
//! let port: u16 = interceptor.wrap_at(&call_site!("load_port"), &policy, || {
//!     std::env::var("PORT")
//!         .map_err(|e| e.to_string())?
//!         .parse::<u16>()
//!         .map_err(|e| e.to_string())
//! });
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod guarded;
mod hook;
pub mod interceptor;
pub mod logging;
pub mod policy;
pub mod terminator;

pub use error::{InterceptError, InterceptResult};
pub use guarded::{Capability, Guarded};
pub use interceptor::{Intercepted, Interceptor, InterceptorBuilder};
pub use logging::{init_logging, LogFormat, DEFAULT_LOG_FILTER};
pub use policy::{InterceptPolicy, PolicyTable};
pub use terminator::{ProcessExit, Terminator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
