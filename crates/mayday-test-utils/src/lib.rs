//! Testing utilities for Mayday workspace
//!
//! Shared fixtures: sample identities, a recording terminator, failing
//! operations and a harness wiring an interceptor to temporary storage.

#![allow(missing_docs)]

use mayday_core::{Interceptor, Terminator};
use mayday_identity::ApplicationIdentity;
use mayday_notify::{BufferSink, ConsoleNotifier};
use mayday_report::{CrashReport, CrashReporter, ReportConfig};
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub fn sample_identity() -> ApplicationIdentity {
    ApplicationIdentity::new("Test App", "1.0.0")
        .with_authors("Test Author")
        .with_homepage("https://test.com")
        .with_support_url("https://test.com/support")
        .with_issue_url("https://test.com/issues")
}

pub fn minimal_identity() -> ApplicationIdentity {
    ApplicationIdentity::new("Bare App", "0.0.1")
}

/// Terminator that records requested codes instead of exiting
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().clone()
    }

    pub fn last(&self) -> Option<i32> {
        self.codes.lock().last().copied()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.codes.lock().push(code);
    }
}

/// Error type used by failing test operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFailure(pub String);

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TestFailure {}

pub fn fail_with<T>(message: &str) -> Result<T, TestFailure> {
    Err(TestFailure(message.to_string()))
}

/// Interceptor writing reports to a temporary directory and notices to buffers
pub struct Harness {
    pub dir: TempDir,
    pub notices: Arc<BufferSink>,
    pub traces: Arc<BufferSink>,
    pub terminator: Arc<RecordingTerminator>,
    pub interceptor: Arc<Interceptor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_identity(sample_identity())
    }

    pub fn with_identity(identity: ApplicationIdentity) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let notices = Arc::new(BufferSink::new());
        let traces = Arc::new(BufferSink::new());
        let terminator = Arc::new(RecordingTerminator::new());

        let interceptor = Interceptor::builder()
            .with_fixed_identity(identity)
            .with_reporter(Arc::new(CrashReporter::new(
                ReportConfig::new().with_dir(dir.path().join("crash-reports")),
            )))
            .with_notifier(Arc::new(ConsoleNotifier::new().with_sink(notices.clone())))
            .with_trace_sink(traces.clone())
            .with_terminator(terminator.clone())
            .build();

        Self {
            dir,
            notices,
            traces,
            terminator,
            interceptor: Arc::new(interceptor),
        }
    }

    pub fn report_dir(&self) -> PathBuf {
        self.dir.path().join("crash-reports")
    }

    pub fn report_files(&self) -> Vec<PathBuf> {
        CrashReporter::new(ReportConfig::new().with_dir(self.report_dir())).list_reports()
    }

    pub fn notice_text(&self) -> String {
        self.notices.contents()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_report(path: &Path) -> CrashReport {
    let json = std::fs::read_to_string(path).unwrap();
    CrashReport::from_json(&json).unwrap()
}
