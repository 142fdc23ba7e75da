//! Metadata resolution chain
//!
//! [`MetadataResolver`] walks its sources in precedence order and keeps,
//! per field, the first value supplied. [`IdentityCell`] holds the result
//! as process-wide read-mostly state.

use crate::identity::{ApplicationIdentity, PartialIdentity};
use crate::sources::{ExplicitSource, IdentitySource, PackageManifest, PropertiesSource, YamlSource};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the file-backed sources are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Directory searched for configuration files
    pub search_dir: PathBuf,
    /// Structured document name
    pub yaml_file: String,
    /// Properties file name
    pub properties_file: String,
}

impl ResolverConfig {
    /// Default configuration (working directory)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With search directory
    #[inline]
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_dir: PathBuf::from("."),
            yaml_file: "application.yml".to_string(),
            properties_file: "application.properties".to_string(),
        }
    }
}

/// Ordered chain of identity sources
#[derive(Debug, Default)]
pub struct MetadataResolver {
    sources: Vec<Box<dyn IdentitySource>>,
}

impl MetadataResolver {
    /// Resolver with no sources; resolves to sentinel defaults
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard chain: explicit, yaml, properties, manifest, defaults
    #[must_use]
    pub fn standard(
        config: &ResolverConfig,
        explicit: ExplicitSource,
        manifest: Option<PackageManifest>,
    ) -> Self {
        let mut resolver = Self::empty()
            .with_source(explicit)
            .with_source(YamlSource::new(config.search_dir.join(&config.yaml_file)))
            .with_source(PropertiesSource::new(
                config.search_dir.join(&config.properties_file),
            ));
        if let Some(manifest) = manifest {
            resolver = resolver.with_source(manifest);
        }
        resolver
    }

    /// Append a lower-precedence source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl IdentitySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the chain has no sources
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve the identity; never fails
    #[must_use]
    pub fn resolve(&self) -> ApplicationIdentity {
        let mut merged = PartialIdentity::empty();
        for source in &self.sources {
            match source.load() {
                Ok(fields) => merged.fill_from(fields),
                Err(e) if e.is_not_found() => {
                    tracing::trace!(source = source.label(), "identity source absent");
                }
                Err(e) => {
                    tracing::debug!(source = source.label(), error = %e, "identity source skipped");
                }
            }
        }
        merged.finish()
    }
}

/// Shared, lazily resolved identity
///
/// Readers get an `Arc` snapshot; [`IdentityCell::refresh`] swaps in a new
/// snapshot without mutating the old one.
#[derive(Debug, Default)]
pub struct IdentityCell {
    resolver: MetadataResolver,
    current: RwLock<Option<Arc<ApplicationIdentity>>>,
}

impl IdentityCell {
    /// Cell resolving lazily through `resolver`
    #[inline]
    #[must_use]
    pub fn new(resolver: MetadataResolver) -> Self {
        Self {
            resolver,
            current: RwLock::new(None),
        }
    }

    /// Cell holding a fixed identity
    #[inline]
    #[must_use]
    pub fn fixed(identity: ApplicationIdentity) -> Self {
        Self {
            resolver: MetadataResolver::empty(),
            current: RwLock::new(Some(Arc::new(identity))),
        }
    }

    /// Current identity, resolving on first use
    #[must_use]
    pub fn current(&self) -> Arc<ApplicationIdentity> {
        if let Some(identity) = self.current.read().as_ref() {
            return Arc::clone(identity);
        }

        let mut guard = self.current.write();
        Arc::clone(guard.get_or_insert_with(|| Arc::new(self.resolver.resolve())))
    }

    /// Re-run resolution and swap in the result
    pub fn refresh(&self) -> Arc<ApplicationIdentity> {
        let fresh = Arc::new(self.resolver.resolve());
        *self.current.write() = Some(Arc::clone(&fresh));
        fresh
    }

    /// Install an explicit identity
    pub fn replace(&self, identity: ApplicationIdentity) {
        *self.current.write() = Some(Arc::new(identity));
    }

    /// Whether resolution has happened yet
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.current.read().is_some()
    }
}
