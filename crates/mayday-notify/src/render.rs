//! Notice rendering
//!
//! Pure functions turning an identity and a failure into the text shown to
//! the user. Section omission compares strings exactly.

use mayday_identity::ApplicationIdentity;
use mayday_report::Failure;
use std::path::Path;

/// Message used when a policy leaves its own message empty
pub const DEFAULT_MESSAGE: &str = "An error occurred";

const HEADLINE: &str = "Well, this is embarrassing.";

/// Whether a custom message deserves its own section
#[inline]
#[must_use]
pub fn is_custom_message(message: &str) -> bool {
    !message.is_empty() && message != DEFAULT_MESSAGE
}

/// Notice shown after a crash report was attempted
#[must_use]
pub fn render_with_report(
    identity: &ApplicationIdentity,
    message: &str,
    report_path: Option<&Path>,
) -> String {
    let name = &identity.name;
    let mut out = String::with_capacity(512);

    out.push('\n');
    push_line(&mut out, HEADLINE);
    out.push('\n');
    out.push_str(name);
    out.push_str(" had a problem and crashed. To help us diagnose\n");
    push_line(&mut out, "the problem you can send us a crash report.");
    out.push('\n');

    if is_custom_message(message) {
        push_line(&mut out, message);
        out.push('\n');
    }

    if let Some(path) = report_path {
        push_line(&mut out, "We have generated a report file at:");
        out.push('\n');
        push_line(&mut out, &format!("  {}", path.display()));
        out.push('\n');
    }

    push_line(&mut out, "Submit an issue or email with the subject of:");
    out.push('\n');
    push_line(&mut out, &format!("  {name} Crash Report"));
    out.push('\n');

    push_link(&mut out, "- Open an issue at:", &identity.issue_url);
    push_link(&mut out, "- Get help at:", &identity.support_url);

    if !identity.authors_unknown() {
        push_line(&mut out, "- Contact the authors:");
        for author in &identity.authors {
            push_line(&mut out, &format!("    {author}"));
        }
        out.push('\n');
    }

    push_line(
        &mut out,
        "We take privacy seriously, and do not perform any automated error collection.",
    );
    push_line(
        &mut out,
        "In order to improve the software, we rely on people to submit reports.",
    );
    out.push('\n');
    push_line(&mut out, "Thank you kindly!");
    out
}

/// Notice shown when no report is created
#[must_use]
pub fn render_error(identity: &ApplicationIdentity, message: &str, failure: &Failure) -> String {
    let mut out = String::with_capacity(256);

    out.push('\n');
    push_line(&mut out, HEADLINE);
    out.push('\n');
    push_line(&mut out, &format!("{} encountered an error:", identity.name));

    if is_custom_message(message) {
        push_line(&mut out, &format!("  {message}"));
    }
    push_line(&mut out, &format!("  {}", failure.short_kind()));
    if let Some(detail) = failure.message() {
        push_line(&mut out, &format!("  {detail}"));
    }

    out.push('\n');
    push_line(&mut out, "The application will continue running.");
    out
}

/// Raw trace: `<kind>: <message>` followed by one frame per line
#[must_use]
pub fn render_trace(failure: &Failure) -> String {
    failure.trace_text()
}

fn push_link(out: &mut String, label: &str, url: &str) {
    if url.is_empty() {
        return;
    }
    push_line(out, label);
    push_line(out, &format!("    {url}"));
    out.push('\n');
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
