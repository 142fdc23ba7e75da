//! Crash report model
//!
//! Field names follow the established report format:
//!
//! ```text
//! name, operating_system, version, explanation, cause,
//! method {class, method}, backtrace [{class, method, file, line}],
//! system_info {...}, application_info {name, version, authors, homepage?, support?, issues?}
//! ```

use crate::backtrace::StackFrame;
use crate::failure::{CallSite, Failure};
use crate::system::SystemInfo;
use indexmap::IndexMap;
use mayday_identity::ApplicationIdentity;
use serde::{Deserialize, Serialize};

/// Structured snapshot of one failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashReport {
    /// Application name
    pub name: String,
    /// `"<os> <release>"`
    pub operating_system: String,
    /// Application version
    pub version: String,
    /// Human-readable explanation
    pub explanation: String,
    /// `<kind>: <message>`
    pub cause: String,
    /// Guarded operation, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<CallSite>,
    /// Backtrace at the point the failure was intercepted
    #[serde(default)]
    pub backtrace: Vec<StackFrame>,
    /// Host facts
    pub system_info: SystemInfo,
    /// Identity fields, in insertion order
    pub application_info: IndexMap<String, String>,
}

impl CrashReport {
    /// Assemble a report; never fails
    #[must_use]
    pub fn build(
        identity: &ApplicationIdentity,
        failure: &Failure,
        call_site: Option<&CallSite>,
    ) -> Self {
        let system_info = SystemInfo::collect();
        Self {
            name: identity.name.clone(),
            operating_system: system_info.operating_system(),
            version: identity.version.clone(),
            explanation: explanation(&identity.name),
            cause: failure.cause(),
            method: call_site.cloned(),
            backtrace: failure.frames().to_vec(),
            system_info,
            application_info: application_info(identity),
        }
    }

    /// Indented JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a report back from JSON
    ///
    /// # Errors
    /// Returns error if the text is not a report document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Explanation text stored in every report
#[must_use]
pub fn explanation(name: &str) -> String {
    format!(
        "Well, this is embarrassing.\n\n\
         {name} had a problem and crashed. To help us diagnose the problem you can send us a crash report.\n\n\
         We have generated a report file at the location below. Please include this file in your bug report."
    )
}

/// `application_info` mapping; optional URLs only when non-empty
#[must_use]
pub fn application_info(identity: &ApplicationIdentity) -> IndexMap<String, String> {
    let mut info = IndexMap::new();
    info.insert("name".to_string(), identity.name.clone());
    info.insert("version".to_string(), identity.version.clone());
    info.insert("authors".to_string(), identity.authors_joined());

    let optional = [
        ("homepage", &identity.homepage),
        ("support", &identity.support_url),
        ("issues", &identity.issue_url),
    ];
    for (key, value) in optional {
        if !value.is_empty() {
            info.insert(key.to_string(), value.clone());
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity() -> ApplicationIdentity {
        ApplicationIdentity::new("Report App", "1.2.3")
            .with_authors("Ann, Ben")
            .with_issue_url("https://example.com/issues")
    }

    #[test]
    fn build_fills_identity_and_cause() {
        let failure = Failure::new("std::io::Error", Some("boom".into()));
        let site = CallSite::new("report_app::jobs", "run");
        let report = CrashReport::build(&identity(), &failure, Some(&site));

        assert_eq!(report.name, "Report App");
        assert_eq!(report.version, "1.2.3");
        assert_eq!(report.cause, "std::io::Error: boom");
        assert_eq!(report.method, Some(site));
        assert!(report.explanation.contains("Report App had a problem and crashed"));
        assert!(report.backtrace.is_empty());
    }

    #[test]
    fn application_info_skips_empty_urls() {
        let info = application_info(&identity());
        let keys: Vec<&str> = info.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "version", "authors", "issues"]);
        assert_eq!(info["authors"], "Ann, Ben");
    }

    #[test]
    fn missing_call_site_omits_method() {
        let failure = Failure::new("panic", None);
        let report = CrashReport::build(&ApplicationIdentity::default(), &failure, None);
        let json = report.to_json_pretty().unwrap();
        assert!(!json.contains("\"method\": {"));
        assert!(json.contains("\"cause\": \"panic: No message\""));
        assert_eq!(report.application_info["authors"], "Unknown");
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let failure = Failure::new("Custom", Some("round trip".into())).capture_backtrace();
        let site = CallSite::new("report_app", "trip");
        let report = CrashReport::build(&identity(), &failure, Some(&site));

        let json = report.to_json_pretty().unwrap();
        let parsed = CrashReport::from_json(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn json_uses_report_field_names() {
        let failure = Failure::new("Custom", Some("names".into()))
            .with_frames(vec![StackFrame::from_symbol("app::module::func").at("src/lib.rs", None)]);
        let report =
            CrashReport::build(&identity(), &failure, Some(&CallSite::new("app", "func")));
        let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        for key in [
            "name",
            "operating_system",
            "version",
            "explanation",
            "cause",
            "method",
            "backtrace",
            "system_info",
            "application_info",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["method"]["class"], "app");
        assert_eq!(value["method"]["method"], "func");
        assert_eq!(value["backtrace"][0]["class"], "app::module");
        assert_eq!(value["backtrace"][0]["line"], serde_json::Value::Null);
        for key in [
            "java_version",
            "java_vendor",
            "os_name",
            "os_version",
            "os_arch",
            "max_memory_mb",
            "total_memory_mb",
            "free_memory_mb",
            "processors",
            "uptime_ms",
        ] {
            assert!(value["system_info"].get(key).is_some(), "missing system_info.{key}");
        }
    }
}
