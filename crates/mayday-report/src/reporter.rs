//! Report building and persistence
//!
//! Reports land in `<dir>/crash-<yyyy-MM-dd-HH-mm-ss>.<ext>`. Files are
//! opened with `create_new`; when a name for the current second is taken
//! the writer moves on to `crash-<ts>-1.<ext>`, `crash-<ts>-2.<ext>`, ...

use crate::error::{ReportError, ReportResult};
use crate::failure::{CallSite, Failure};
use crate::report::CrashReport;
use mayday_identity::ApplicationIdentity;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name prefix of every report
pub const REPORT_PREFIX: &str = "crash-";

/// `yyyy-MM-dd-HH-mm-ss`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Candidate names tried per second before giving up
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Environment variable overriding the report directory
pub const REPORT_DIR_ENV: &str = "MAYDAY_REPORT_DIR";

/// Where and how reports are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Report directory, relative paths resolve against the working directory
    pub dir: PathBuf,
    /// File extension without the dot
    pub extension: String,
}

impl ReportConfig {
    /// Default configuration (`crash-reports/*.json`)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with `MAYDAY_REPORT_DIR` applied
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(REPORT_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new().with_dir(dir),
            _ => Self::new(),
        }
    }

    /// With report directory
    #[inline]
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("crash-reports"),
            extension: "json".to_string(),
        }
    }
}

/// Builds and persists crash reports
pub trait Reporter: Send + Sync {
    /// Assemble a report; never fails
    fn build(
        &self,
        identity: &ApplicationIdentity,
        failure: &Failure,
        call_site: Option<&CallSite>,
    ) -> CrashReport;

    /// Write a report, returning its absolute path
    ///
    /// Failures are logged and yield `None`.
    fn persist(&self, report: &CrashReport) -> Option<PathBuf>;
}

/// File-backed [`Reporter`]
#[derive(Debug, Clone, Default)]
pub struct CrashReporter {
    config: ReportConfig,
}

impl CrashReporter {
    /// Create reporter writing per `config`
    #[inline]
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        crate::system::mark_process_start();
        Self { config }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Write a report, returning the typed error on failure
    ///
    /// # Errors
    /// Returns error if the directory cannot be created, the report cannot
    /// be serialized or written, or no free file name remains
    pub fn try_persist(&self, report: &CrashReport) -> ReportResult<PathBuf> {
        let dir = &self.config.dir;
        std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let json = report.to_json_pretty()?;
        let stem = format!(
            "{REPORT_PREFIX}{}",
            chrono::Local::now().format(TIMESTAMP_FORMAT)
        );

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(self.file_name(&stem, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ReportError::write_error(path, e)),
            };

            if let Err(e) = file.write_all(json.as_bytes()).and_then(|()| file.flush()) {
                let _ = std::fs::remove_file(&path);
                return Err(ReportError::write_error(path, e));
            }
            return Ok(absolutize(&path));
        }

        Err(ReportError::NamesExhausted {
            dir: dir.clone(),
            stem,
            attempts: MAX_NAME_ATTEMPTS,
        })
    }

    fn file_name(&self, stem: &str, attempt: usize) -> String {
        match attempt {
            0 => format!("{stem}.{}", self.config.extension),
            n => format!("{stem}-{n}.{}", self.config.extension),
        }
    }

    /// Reports in the configured directory, newest first
    ///
    /// Returns an empty list when the directory does not exist.
    #[must_use]
    pub fn list_reports(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.config.dir) else {
            return Vec::new();
        };

        let suffix = format!(".{}", self.config.extension);
        let mut reports: Vec<(String, usize, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                let (stamp, seq) = parse_report_name(name, &suffix)?;
                Some((stamp.to_string(), seq, path))
            })
            .collect();

        reports.sort_by(|a, b| (&b.0, b.1).cmp(&(&a.0, a.1)));
        reports.into_iter().map(|(_, _, path)| absolutize(&path)).collect()
    }
}

impl Reporter for CrashReporter {
    fn build(
        &self,
        identity: &ApplicationIdentity,
        failure: &Failure,
        call_site: Option<&CallSite>,
    ) -> CrashReport {
        CrashReport::build(identity, failure, call_site)
    }

    fn persist(&self, report: &CrashReport) -> Option<PathBuf> {
        match self.try_persist(report) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "crash report written");
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create crash report");
                None
            }
        }
    }
}

/// Split `crash-<stamp>[-<n>]<suffix>` into stamp and sequence number
fn parse_report_name<'a>(name: &'a str, suffix: &str) -> Option<(&'a str, usize)> {
    let body = name.strip_prefix(REPORT_PREFIX)?.strip_suffix(suffix)?;
    let stamp_len = "yyyy-MM-dd-HH-mm-ss".len();
    if body.len() < stamp_len || !body.is_char_boundary(stamp_len) {
        return None;
    }

    let (stamp, rest) = body.split_at(stamp_len);
    let seq = match rest {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };
    Some((stamp, seq))
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
