//! Output sinks
//!
//! Every [`OutputSink::emit`] call writes one whole message; concurrent
//! callers never interleave inside a message.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::io::{self, Write};

/// Destination for rendered notices and raw traces
pub trait OutputSink: Debug + Send + Sync {
    /// Write one complete message
    ///
    /// # Errors
    /// Returns error if the underlying stream rejects the write
    fn emit(&self, text: &str) -> io::Result<()>;
}

/// Standard error, locked for the duration of each message
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn emit(&self, text: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            stderr.write_all(b"\n")?;
        }
        stderr.flush()
    }
}

/// In-memory sink keeping each message separately
#[derive(Debug, Default)]
pub struct BufferSink {
    messages: Mutex<Vec<String>>,
}

impl BufferSink {
    /// Create empty buffer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages emitted so far
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// All messages concatenated
    #[must_use]
    pub fn contents(&self) -> String {
        self.messages.lock().concat()
    }

    /// Number of messages emitted
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether nothing was emitted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Drop all messages
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl OutputSink for BufferSink {
    fn emit(&self, text: &str) -> io::Result<()> {
        self.messages.lock().push(text.to_string());
        Ok(())
    }
}

/// Sink forwarding each message to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn emit(&self, text: &str) -> io::Result<()> {
        tracing::info!("{text}");
        Ok(())
    }
}
