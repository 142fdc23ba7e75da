//! Application identity model
//!
//! Defines the resolved [`ApplicationIdentity`] together with the
//! per-source [`PartialIdentity`] that resolution merges field by field.

use serde::{Deserialize, Serialize};

/// Name used when no source supplies one
pub const UNKNOWN_NAME: &str = "Unknown Application";

/// Version used when no source supplies one
pub const UNKNOWN_VERSION: &str = "Unknown Version";

/// Single author entry meaning "authors not known"
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Inputs treated as "no authors configured"
const AUTHOR_SENTINELS: &[&str] = &["Unknown Authors", "[Unknown Authors]", UNKNOWN_AUTHOR];

/// Identity of the host application as shown in reports and notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIdentity {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Ordered author list, `["Unknown"]` when not configured
    pub authors: Vec<String>,
    /// Homepage URL, empty when not configured
    pub homepage: String,
    /// Support URL, empty when not configured
    pub support_url: String,
    /// Issue tracker URL, empty when not configured
    pub issue_url: String,
}

impl ApplicationIdentity {
    /// Create identity with name and version, other fields at their defaults
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// With authors parsed from a comma-joined string
    #[inline]
    #[must_use]
    pub fn with_authors(mut self, authors: &str) -> Self {
        self.authors = parse_authors(Some(authors));
        self
    }

    /// With homepage URL
    #[inline]
    #[must_use]
    pub fn with_homepage(mut self, url: impl Into<String>) -> Self {
        self.homepage = url.into();
        self
    }

    /// With support URL
    #[inline]
    #[must_use]
    pub fn with_support_url(mut self, url: impl Into<String>) -> Self {
        self.support_url = url.into();
        self
    }

    /// With issue tracker URL
    #[inline]
    #[must_use]
    pub fn with_issue_url(mut self, url: impl Into<String>) -> Self {
        self.issue_url = url.into();
        self
    }

    /// Whether the author list is the "not configured" marker
    #[inline]
    #[must_use]
    pub fn authors_unknown(&self) -> bool {
        self.authors.len() == 1 && self.authors[0] == UNKNOWN_AUTHOR
    }

    /// Authors joined the same way they are parsed
    #[inline]
    #[must_use]
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

impl Default for ApplicationIdentity {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            version: UNKNOWN_VERSION.to_string(),
            authors: vec![UNKNOWN_AUTHOR.to_string()],
            homepage: String::new(),
            support_url: String::new(),
            issue_url: String::new(),
        }
    }
}

/// Parse a comma-joined author string
///
/// Splits on `,` followed by optional whitespace. Absent, blank or
/// sentinel input yields `["Unknown"]`. The result is stable under
/// `parse_authors(Some(&result.join(", ")))`.
///
/// # Examples
/// ```
/// # use mayday_identity::parse_authors;
/// assert_eq!(parse_authors(Some("A, B,C")), vec!["A", "B", "C"]);
/// assert_eq!(parse_authors(None), vec!["Unknown"]);
/// ```
#[must_use]
pub fn parse_authors(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => normalize_authors(raw.split(',')),
        None => vec![UNKNOWN_AUTHOR.to_string()],
    }
}

/// Normalize an author sequence from any source
pub(crate) fn normalize_authors<'a>(parts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let authors: Vec<String> = parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    match authors.as_slice() {
        [] => vec![UNKNOWN_AUTHOR.to_string()],
        [only] if AUTHOR_SENTINELS.contains(&only.as_str()) => vec![UNKNOWN_AUTHOR.to_string()],
        _ => authors,
    }
}

/// Identity fields supplied by a single source
///
/// `None` means the source had nothing to say about that field and
/// resolution should consult the next tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialIdentity {
    /// Application name
    pub name: Option<String>,
    /// Application version
    pub version: Option<String>,
    /// Authors
    pub authors: Option<Vec<String>>,
    /// Homepage URL
    pub homepage: Option<String>,
    /// Support URL
    pub support_url: Option<String>,
    /// Issue tracker URL
    pub issue_url: Option<String>,
}

impl PartialIdentity {
    /// Empty partial identity
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a string field from raw text; blank text is ignored
    pub fn set(&mut self, field: IdentityField, raw: &str) {
        let value = raw.trim();
        if value.is_empty() {
            return;
        }
        match field {
            IdentityField::Name => self.name = Some(value.to_string()),
            IdentityField::Version => self.version = Some(value.to_string()),
            IdentityField::Authors => self.set_authors(value.split(',')),
            IdentityField::Homepage => self.homepage = Some(value.to_string()),
            IdentityField::SupportUrl => self.support_url = Some(value.to_string()),
            IdentityField::IssueUrl => self.issue_url = Some(value.to_string()),
        }
    }

    /// Set authors from a sequence; "unknown" results count as unset
    pub fn set_authors<'a>(&mut self, parts: impl IntoIterator<Item = &'a str>) {
        let authors = normalize_authors(parts);
        if authors.len() == 1 && authors[0] == UNKNOWN_AUTHOR {
            return;
        }
        self.authors = Some(authors);
    }

    /// Whether the source supplied no field at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill fields still unset here from a lower-precedence source
    pub fn fill_from(&mut self, lower: PartialIdentity) {
        self.name = self.name.take().or(lower.name);
        self.version = self.version.take().or(lower.version);
        self.authors = self.authors.take().or(lower.authors);
        self.homepage = self.homepage.take().or(lower.homepage);
        self.support_url = self.support_url.take().or(lower.support_url);
        self.issue_url = self.issue_url.take().or(lower.issue_url);
    }

    /// Apply sentinel defaults to every unset field
    #[must_use]
    pub fn finish(self) -> ApplicationIdentity {
        let defaults = ApplicationIdentity::default();
        ApplicationIdentity {
            name: self.name.unwrap_or(defaults.name),
            version: self.version.unwrap_or(defaults.version),
            authors: self.authors.unwrap_or(defaults.authors),
            homepage: self.homepage.unwrap_or(defaults.homepage),
            support_url: self.support_url.unwrap_or(defaults.support_url),
            issue_url: self.issue_url.unwrap_or(defaults.issue_url),
        }
    }
}

/// Identity field selector used by the flat sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// Application name
    Name,
    /// Application version
    Version,
    /// Comma-joined authors
    Authors,
    /// Homepage URL
    Homepage,
    /// Support URL
    SupportUrl,
    /// Issue tracker URL
    IssueUrl,
}

impl IdentityField {
    /// All fields in resolution order
    pub const ALL: [IdentityField; 6] = [
        Self::Name,
        Self::Version,
        Self::Authors,
        Self::Homepage,
        Self::SupportUrl,
        Self::IssueUrl,
    ];

    /// Key used in properties files
    #[inline]
    #[must_use]
    pub fn property_key(self) -> &'static str {
        match self {
            Self::Name => "app.name",
            Self::Version => "app.version",
            Self::Authors => "app.authors",
            Self::Homepage => "app.homepage",
            Self::SupportUrl => "app.support-url",
            Self::IssueUrl => "app.issue-url",
        }
    }

    /// Environment variable holding the explicit value
    #[inline]
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Name => "APP_NAME",
            Self::Version => "APP_VERSION",
            Self::Authors => "APP_AUTHORS",
            Self::Homepage => "APP_HOMEPAGE",
            Self::SupportUrl => "APP_SUPPORT_URL",
            Self::IssueUrl => "APP_ISSUE_URL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sentinels() {
        let identity = ApplicationIdentity::default();
        assert_eq!(identity.name, "Unknown Application");
        assert_eq!(identity.version, "Unknown Version");
        assert_eq!(identity.authors, vec!["Unknown"]);
        assert!(identity.homepage.is_empty());
        assert!(identity.support_url.is_empty());
        assert!(identity.issue_url.is_empty());
        assert!(identity.authors_unknown());
    }

    #[test]
    fn authors_split_on_comma_and_whitespace() {
        assert_eq!(
            parse_authors(Some("John Doe, Jane Smith,Bob Wilson")),
            vec!["John Doe", "Jane Smith", "Bob Wilson"]
        );
        assert_eq!(parse_authors(Some("John Doe")), vec!["John Doe"]);
    }

    #[test]
    fn blank_and_sentinel_authors_are_unknown() {
        assert_eq!(parse_authors(Some("")), vec!["Unknown"]);
        assert_eq!(parse_authors(Some("  ")), vec!["Unknown"]);
        assert_eq!(parse_authors(Some(",")), vec!["Unknown"]);
        assert_eq!(parse_authors(Some("Unknown Authors")), vec!["Unknown"]);
        assert_eq!(parse_authors(Some("[Unknown Authors]")), vec!["Unknown"]);
        assert_eq!(parse_authors(Some("Unknown Authors,")), vec!["Unknown"]);
    }

    #[test]
    fn partial_set_ignores_blank() {
        let mut partial = PartialIdentity::empty();
        partial.set(IdentityField::Name, "   ");
        partial.set(IdentityField::Authors, "Unknown Authors");
        assert!(partial.is_empty());

        partial.set(IdentityField::Version, " 1.2.3 ");
        assert_eq!(partial.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn fill_from_keeps_higher_precedence() {
        let mut high = PartialIdentity::empty();
        high.set(IdentityField::Name, "High");

        let mut low = PartialIdentity::empty();
        low.set(IdentityField::Name, "Low");
        low.set(IdentityField::Version, "0.9");

        high.fill_from(low);
        let identity = high.finish();
        assert_eq!(identity.name, "High");
        assert_eq!(identity.version, "0.9");
        assert_eq!(identity.authors, vec!["Unknown"]);
    }

    #[test]
    fn builder_sets_fields() {
        let identity = ApplicationIdentity::new("My App", "2.0.0")
            .with_authors("Alice, Bob")
            .with_issue_url("https://github.com/myapp/issues");
        assert_eq!(identity.authors, vec!["Alice", "Bob"]);
        assert_eq!(identity.authors_joined(), "Alice, Bob");
        assert!(!identity.authors_unknown());
        assert_eq!(identity.issue_url, "https://github.com/myapp/issues");
    }
}
