//! Identity sources
//!
//! Each tier of the resolution chain is an [`IdentitySource`]:
//! - [`ExplicitSource`]: values supplied by the host (code or environment)
//! - [`YamlSource`]: `app` section of a structured document
//! - [`PropertiesSource`]: flat `app.*` keys
//! - [`PackageManifest`]: Cargo package metadata of the host crate

use crate::error::SourceError;
use crate::identity::{IdentityField, PartialIdentity};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// One tier of the metadata resolution chain
pub trait IdentitySource: Debug + Send + Sync {
    /// Short label used in diagnostics
    fn label(&self) -> &str;

    /// Load whatever identity fields this source supplies
    ///
    /// # Errors
    /// Returns error if the source exists but cannot be read or parsed
    fn load(&self) -> Result<PartialIdentity, SourceError>;
}

/// Values supplied directly by the host
#[derive(Debug, Clone, Default)]
pub struct ExplicitSource {
    fields: PartialIdentity,
}

impl ExplicitSource {
    /// Create empty explicit source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `APP_NAME`, `APP_VERSION`, `APP_AUTHORS`, `APP_HOMEPAGE`,
    /// `APP_SUPPORT_URL` and `APP_ISSUE_URL` from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup keyed by environment variable name
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut fields = PartialIdentity::empty();
        for field in IdentityField::ALL {
            if let Some(value) = lookup(field.env_var()) {
                fields.set(field, &value);
            }
        }
        Self { fields }
    }

    /// With a single field value
    #[inline]
    #[must_use]
    pub fn with(mut self, field: IdentityField, value: &str) -> Self {
        self.fields.set(field, value);
        self
    }

    /// With application name
    #[inline]
    #[must_use]
    pub fn with_name(self, name: &str) -> Self {
        self.with(IdentityField::Name, name)
    }

    /// With application version
    #[inline]
    #[must_use]
    pub fn with_version(self, version: &str) -> Self {
        self.with(IdentityField::Version, version)
    }

    /// With comma-joined authors
    #[inline]
    #[must_use]
    pub fn with_authors(self, authors: &str) -> Self {
        self.with(IdentityField::Authors, authors)
    }
}

impl IdentitySource for ExplicitSource {
    fn label(&self) -> &str {
        "explicit"
    }

    fn load(&self) -> Result<PartialIdentity, SourceError> {
        Ok(self.fields.clone())
    }
}

/// Structured document with an `app` section
#[derive(Debug, Clone)]
pub struct YamlSource {
    path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct YamlDocument {
    #[serde(default)]
    app: Option<AppSection>,
}

#[derive(Debug, Default, Deserialize)]
struct AppSection {
    name: Option<Value>,
    version: Option<Value>,
    authors: Option<Value>,
    homepage: Option<Value>,
    #[serde(alias = "support-url", alias = "supportUrl")]
    support_url: Option<Value>,
    #[serde(alias = "issue-url", alias = "issueUrl")]
    issue_url: Option<Value>,
}

/// Text of a scalar YAML value; `version: 1.0` arrives as a number
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl YamlSource {
    /// Source reading the document at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse document text into identity fields
    ///
    /// # Errors
    /// Returns error if the text is not valid YAML for the expected shape
    pub fn parse(content: &str) -> Result<PartialIdentity, serde_yaml::Error> {
        let mut fields = PartialIdentity::empty();
        if content.trim().is_empty() {
            return Ok(fields);
        }

        let document: YamlDocument = serde_yaml::from_str(content)?;
        let Some(app) = document.app else {
            return Ok(fields);
        };

        let flat = [
            (IdentityField::Name, app.name),
            (IdentityField::Version, app.version),
            (IdentityField::Homepage, app.homepage),
            (IdentityField::SupportUrl, app.support_url),
            (IdentityField::IssueUrl, app.issue_url),
        ];
        for (field, value) in flat {
            if let Some(text) = value.as_ref().and_then(scalar_text) {
                fields.set(field, &text);
            }
        }

        match app.authors {
            Some(Value::Sequence(list)) => {
                let names: Vec<String> = list.iter().filter_map(scalar_text).collect();
                fields.set_authors(names.iter().map(String::as_str));
            }
            Some(other) => {
                if let Some(joined) = scalar_text(&other) {
                    fields.set(IdentityField::Authors, &joined);
                }
            }
            None => {}
        }

        Ok(fields)
    }
}

impl IdentitySource for YamlSource {
    fn label(&self) -> &str {
        "yaml"
    }

    fn load(&self) -> Result<PartialIdentity, SourceError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SourceError::io_error(&self.path, e))?;
        Self::parse(&content).map_err(|source| SourceError::InvalidYaml {
            path: self.path.clone(),
            source,
        })
    }
}

/// Flat `key=value` properties file
#[derive(Debug, Clone)]
pub struct PropertiesSource {
    path: PathBuf,
}

impl PropertiesSource {
    /// Source reading the file at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse properties text into a key/value map
    ///
    /// Accepts `key=value`, `key: value` and `key value`. Lines starting
    /// with `#` or `!` are comments. Returns the 1-based number of the
    /// first line with an empty key on failure.
    pub fn parse_pairs(content: &str) -> Result<HashMap<String, String>, usize> {
        let mut pairs = HashMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let split = line
                .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
                .unwrap_or(line.len());
            let key = line[..split].trim_end();
            if key.is_empty() {
                return Err(index + 1);
            }

            let rest = line[split..].trim_start();
            let value = rest
                .strip_prefix('=')
                .or_else(|| rest.strip_prefix(':'))
                .unwrap_or(rest)
                .trim();
            pairs.insert(key.to_string(), value.to_string());
        }
        Ok(pairs)
    }

    /// Parse properties text into identity fields
    ///
    /// # Errors
    /// Returns the offending line number if a line has an empty key
    pub fn parse(content: &str) -> Result<PartialIdentity, usize> {
        let pairs = Self::parse_pairs(content)?;
        let mut fields = PartialIdentity::empty();
        for field in IdentityField::ALL {
            if let Some(value) = pairs.get(field.property_key()) {
                fields.set(field, value);
            }
        }
        Ok(fields)
    }
}

impl IdentitySource for PropertiesSource {
    fn label(&self) -> &str {
        "properties"
    }

    fn load(&self) -> Result<PartialIdentity, SourceError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SourceError::io_error(&self.path, e))?;
        Self::parse(&content).map_err(|line| SourceError::InvalidProperties {
            path: self.path.clone(),
            line,
        })
    }
}

/// Cargo package metadata of the host crate
///
/// Usually captured with [`package_manifest!`](crate::package_manifest),
/// which expands `CARGO_PKG_*` in the calling crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Package name
    pub title: String,
    /// Package version
    pub version: String,
    /// Colon-separated Cargo authors
    pub authors: String,
    /// Homepage, falling back to repository
    pub homepage: String,
}

impl PackageManifest {
    /// Manifest with title and version
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// With Cargo authors (`A <a@x>:B`)
    #[inline]
    #[must_use]
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    /// With homepage; ignored when blank
    #[inline]
    #[must_use]
    pub fn with_homepage(mut self, homepage: &str) -> Self {
        if !homepage.trim().is_empty() {
            self.homepage = homepage.trim().to_string();
        }
        self
    }

    /// With repository, used only when no homepage is set
    #[inline]
    #[must_use]
    pub fn with_repository(self, repository: &str) -> Self {
        if self.homepage.is_empty() {
            return self.with_homepage(repository);
        }
        self
    }
}

impl IdentitySource for PackageManifest {
    fn label(&self) -> &str {
        "manifest"
    }

    fn load(&self) -> Result<PartialIdentity, SourceError> {
        let mut fields = PartialIdentity::empty();
        fields.set(IdentityField::Name, &self.title);
        fields.set(IdentityField::Version, &self.version);
        fields.set(IdentityField::Homepage, &self.homepage);
        fields.set_authors(self.authors.split(':'));
        Ok(fields)
    }
}

/// Capture the calling crate's Cargo metadata as a [`PackageManifest`]
#[macro_export]
macro_rules! package_manifest {
    () => {
        $crate::PackageManifest::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .with_authors(env!("CARGO_PKG_AUTHORS"))
            .with_homepage(env!("CARGO_PKG_HOMEPAGE"))
            .with_repository(env!("CARGO_PKG_REPOSITORY"))
    };
}
