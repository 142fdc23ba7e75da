//! Mayday Identity
//!
//! Resolves who the host application is, for crash reports and notices.
//!
//! # Resolution order
//!
//! Each field is taken from the first source that supplies it:
//!
//! ```text
//! ExplicitSource → application.yml → application.properties → PackageManifest → defaults
//! ```
//!
//! # Example
//!
//! ```rust
//! use mayday_identity::{ExplicitSource, IdentityCell, MetadataResolver, ResolverConfig};
//!
//! let resolver = MetadataResolver::standard(
//!     &ResolverConfig::new(),
//!     ExplicitSource::new().with_name("demo"),
//!     Some(mayday_identity::package_manifest!()),
//! );
//! let cell = IdentityCell::new(resolver);
//! assert_eq!(cell.current().name, "demo");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod identity;
pub mod resolver;
pub mod sources;

pub use error::SourceError;
pub use identity::{
    parse_authors, ApplicationIdentity, IdentityField, PartialIdentity, UNKNOWN_AUTHOR,
    UNKNOWN_NAME, UNKNOWN_VERSION,
};
pub use resolver::{IdentityCell, MetadataResolver, ResolverConfig};
pub use sources::{ExplicitSource, IdentitySource, PackageManifest, PropertiesSource, YamlSource};
