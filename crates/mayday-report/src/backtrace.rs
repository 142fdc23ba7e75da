//! Backtrace frames
//!
//! Turns the rendered form of [`std::backtrace::Backtrace`] into
//! [`StackFrame`]s. The rendering looks like:
//!
//! ```text
//!    0: mayday_core::interceptor::Interceptor::intercept
//!              at ./src/interceptor.rs:120:9
//!    1: core::ops::function::FnOnce::call_once
//! ```

use serde::{Deserialize, Serialize};

/// One backtrace frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Symbol path without its last segment
    #[serde(rename = "class")]
    pub location: String,
    /// Last segment of the symbol path
    pub method: String,
    /// Source file, if known
    pub file: Option<String>,
    /// Source line, if known
    pub line: Option<u32>,
}

impl StackFrame {
    /// Frame from a demangled symbol with no source location
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = strip_hash(symbol.trim());
        let (location, method) = match split_last_segment(symbol) {
            Some((head, tail)) => (head.to_string(), tail.to_string()),
            None => (String::new(), symbol.to_string()),
        };
        Self {
            location,
            method,
            file: None,
            line: None,
        }
    }

    /// With source location
    #[inline]
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }
}

/// Parse rendered backtrace text into frames
///
/// Lines that are neither a numbered symbol nor an `at` location are
/// ignored, so notes such as "disabled backtrace" yield no frames.
#[must_use]
pub fn parse_frames(rendered: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();
    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line_no) = split_location(location);
                frame.file = Some(file.to_string());
                frame.line = line_no;
            }
            continue;
        }

        if let Some((index, symbol)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(StackFrame::from_symbol(symbol));
            }
        }
    }
    frames
}

/// Split `file:line:col` into file and line
fn split_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let rest = parts.next();

    match (rest, middle, last) {
        (Some(file), Some(line), Some(_col)) if line.parse::<u32>().is_ok() => {
            (file, line.parse().ok())
        }
        _ => match location.rsplit_once(':') {
            Some((file, line)) if line.parse::<u32>().is_ok() => (file, line.parse().ok()),
            _ => (location, None),
        },
    }
}

/// Split a symbol path at its last `::` outside generic brackets
fn split_last_segment(symbol: &str) -> Option<(&str, &str)> {
    let bytes = symbol.as_bytes();
    let mut depth = 0i32;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    split.map(|at| (&symbol[..at], &symbol[at + 2..]))
}

/// Drop a trailing `::h0123456789abcdef` symbol hash
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            head
        }
        _ => symbol,
    }
}
