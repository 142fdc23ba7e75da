use mayday_identity::{
    parse_authors, ExplicitSource, MetadataResolver, PackageManifest, ResolverConfig,
};
use proptest::prelude::*;
use std::fs;

fn standard(dir: &std::path::Path, explicit: ExplicitSource) -> MetadataResolver {
    MetadataResolver::standard(
        &ResolverConfig::new().with_search_dir(dir),
        explicit,
        Some(PackageManifest::new("manifest-title", "0.0.1")),
    )
}

#[test]
fn test_yaml_beats_properties_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.yml"),
        "app:\n  name: Yaml App\n  issue-url: https://example.com/issues\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application.properties"),
        "app.name=Props App\napp.version=4.5.6\napp.authors=Ann, Ben\n",
    )
    .unwrap();

    let identity = standard(dir.path(), ExplicitSource::new()).resolve();
    assert_eq!(identity.name, "Yaml App");
    assert_eq!(identity.version, "4.5.6");
    assert_eq!(identity.authors, vec!["Ann", "Ben"]);
    assert_eq!(identity.issue_url, "https://example.com/issues");
    assert_eq!(identity.support_url, "");
}

#[test]
fn test_explicit_beats_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.yml"), "app:\n  name: Yaml App\n").unwrap();

    let identity = standard(dir.path(), ExplicitSource::new().with_name("Explicit App")).resolve();
    assert_eq!(identity.name, "Explicit App");
    assert_eq!(identity.version, "0.0.1");
}

#[test]
fn test_malformed_yaml_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.yml"), "app: [broken").unwrap();
    fs::write(dir.path().join("application.properties"), "app.name=Props App\n").unwrap();

    let identity = standard(dir.path(), ExplicitSource::new()).resolve();
    assert_eq!(identity.name, "Props App");
}

#[test]
fn test_malformed_properties_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.properties"), "=no key\n").unwrap();

    let identity = standard(dir.path(), ExplicitSource::new()).resolve();
    assert_eq!(identity.name, "manifest-title");
}

#[test]
fn test_no_sources_yield_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = MetadataResolver::standard(
        &ResolverConfig::new().with_search_dir(dir.path()),
        ExplicitSource::new(),
        None,
    );
    let identity = resolver.resolve();
    assert_eq!(identity.name, "Unknown Application");
    assert_eq!(identity.version, "Unknown Version");
    assert_eq!(identity.authors, vec!["Unknown"]);
}

proptest! {
    #[test]
    fn prop_author_parsing_is_idempotent(raw in "[A-Za-z ,.<>@]{0,40}") {
        let once = parse_authors(Some(&raw));
        let twice = parse_authors(Some(&once.join(", ")));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_author_list_round_trips(
        names in prop::collection::vec("[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8})?", 1..6)
    ) {
        prop_assume!(!(names.len() == 1 && names[0].starts_with("Unknown")));
        let parsed = parse_authors(Some(&names.join(", ")));
        prop_assert_eq!(parsed, names);
    }

    #[test]
    fn prop_author_parsing_is_total(raw in ".*") {
        let parsed = parse_authors(Some(&raw));
        prop_assert!(!parsed.is_empty());
        prop_assert!(parsed.iter().all(|a| !a.is_empty() && a.trim() == a));
    }
}
