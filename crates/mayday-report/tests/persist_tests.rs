use mayday_identity::ApplicationIdentity;
use mayday_report::{CallSite, CrashReport, CrashReporter, Failure, ReportConfig, Reporter};
use std::collections::HashSet;
use std::sync::Arc;

fn sample_report() -> CrashReport {
    let identity = ApplicationIdentity::new("Persist App", "0.3.0");
    let failure = Failure::new("std::io::Error", Some("boom".into()));
    CrashReport::build(&identity, &failure, Some(&CallSite::new("persist_app", "save")))
}

#[test]
fn test_persist_creates_directory_and_file() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("nested").join("crash-reports");
    let reporter = CrashReporter::new(ReportConfig::new().with_dir(&dir));

    let path = reporter.persist(&sample_report()).unwrap();
    assert!(path.is_absolute());
    assert!(path.starts_with(&dir));

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("crash-"));
    assert!(name.ends_with(".json"));

    let parsed = CrashReport::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.name, "Persist App");
    assert_eq!(parsed.cause, "std::io::Error: boom");
}

#[test]
fn test_existing_directory_is_fine() {
    let root = tempfile::tempdir().unwrap();
    let reporter = CrashReporter::new(ReportConfig::new().with_dir(root.path()));
    assert!(reporter.persist(&sample_report()).is_some());
    assert!(reporter.persist(&sample_report()).is_some());
}

#[test]
fn test_rapid_failures_never_overwrite() {
    let root = tempfile::tempdir().unwrap();
    let reporter = CrashReporter::new(ReportConfig::new().with_dir(root.path()));

    let paths: Vec<_> = (0..5)
        .map(|_| reporter.persist(&sample_report()).unwrap())
        .collect();
    let unique: HashSet<_> = paths.iter().collect();
    assert_eq!(unique.len(), 5);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 5);
}

#[test]
fn test_concurrent_failures_get_distinct_files() {
    let root = tempfile::tempdir().unwrap();
    let reporter = Arc::new(CrashReporter::new(ReportConfig::new().with_dir(root.path())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reporter = Arc::clone(&reporter);
            std::thread::spawn(move || reporter.persist(&sample_report()).unwrap())
        })
        .collect();
    let paths: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(paths.len(), 8);
    assert_eq!(reporter.list_reports().len(), 8);
}

#[test]
fn test_unwritable_directory_yields_none() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let reporter = CrashReporter::new(ReportConfig::new().with_dir(blocker.join("reports")));
    assert!(reporter.persist(&sample_report()).is_none());
    assert!(reporter.try_persist(&sample_report()).is_err());
}

#[test]
fn test_list_reports_newest_first() {
    let root = tempfile::tempdir().unwrap();
    for name in [
        "crash-2026-01-01-00-00-00.json",
        "crash-2026-01-01-00-00-00-1.json",
        "crash-2026-02-01-00-00-00.json",
        "unrelated.txt",
    ] {
        std::fs::write(root.path().join(name), "{}").unwrap();
    }

    let reporter = CrashReporter::new(ReportConfig::new().with_dir(root.path()));
    let names: Vec<String> = reporter
        .list_reports()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "crash-2026-02-01-00-00-00.json",
            "crash-2026-01-01-00-00-00-1.json",
            "crash-2026-01-01-00-00-00.json",
        ]
    );
}
