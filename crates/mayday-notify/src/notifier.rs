//! Console notifier

use crate::render::{render_error, render_trace, render_with_report};
use crate::sink::{OutputSink, StderrSink};
use mayday_identity::ApplicationIdentity;
use mayday_report::Failure;
use std::path::Path;
use std::sync::Arc;

/// Tells the user that something went wrong
pub trait Notify: Send + Sync {
    /// Announce a crash for which a report was attempted
    fn notify_with_report(
        &self,
        identity: &ApplicationIdentity,
        message: &str,
        report_path: Option<&Path>,
    );

    /// Announce a failure the application recovers from without a report
    fn notify(&self, identity: &ApplicationIdentity, message: &str, failure: &Failure);
}

/// [`Notify`] writing rendered notices to an [`OutputSink`]
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    sink: Arc<dyn OutputSink>,
}

impl ConsoleNotifier {
    /// Notifier writing to stderr
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With output sink
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sink in use
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    /// Write the raw failure trace to the notifier's sink
    pub fn emit_trace(&self, failure: &Failure) {
        emit_trace(self.sink.as_ref(), failure);
    }

    fn emit(&self, text: &str) {
        emit_swallowing(self.sink.as_ref(), text);
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self {
            sink: Arc::new(StderrSink),
        }
    }
}

impl Notify for ConsoleNotifier {
    fn notify_with_report(
        &self,
        identity: &ApplicationIdentity,
        message: &str,
        report_path: Option<&Path>,
    ) {
        self.emit(&render_with_report(identity, message, report_path));
    }

    fn notify(&self, identity: &ApplicationIdentity, message: &str, failure: &Failure) {
        self.emit(&render_error(identity, message, failure));
    }
}

/// Write the raw failure trace to `sink`
///
/// Write errors are logged and dropped.
pub fn emit_trace(sink: &dyn OutputSink, failure: &Failure) {
    emit_swallowing(sink, &render_trace(failure));
}

fn emit_swallowing(sink: &dyn OutputSink, text: &str) {
    if let Err(e) = sink.emit(text) {
        tracing::warn!(error = %e, "failed to write notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferSink;
    use std::io;

    #[derive(Debug)]
    struct BrokenSink;

    impl OutputSink for BrokenSink {
        fn emit(&self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn notifier() -> (ConsoleNotifier, Arc<BufferSink>) {
        let buffer = Arc::new(BufferSink::new());
        let notifier = ConsoleNotifier::new().with_sink(buffer.clone());
        (notifier, buffer)
    }

    #[test]
    fn each_notice_is_one_message() {
        let (notifier, buffer) = notifier();
        let identity = ApplicationIdentity::new("Test App", "1.0.0");
        let failure = Failure::new("std::io::Error", Some("boom".into()));

        notifier.notify_with_report(&identity, "", Some(Path::new("/tmp/crash-x.json")));
        notifier.notify(&identity, "", &failure);

        let messages = buffer.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("/tmp/crash-x.json"));
        assert!(messages[1].contains("The application will continue running."));
    }

    #[test]
    fn trace_goes_to_sink() {
        let (notifier, buffer) = notifier();
        let failure = Failure::new("app::Oops", Some("bad state".into()));
        notifier.emit_trace(&failure);
        assert_eq!(buffer.contents(), "app::Oops: bad state");
    }

    #[test]
    fn broken_sink_is_swallowed() {
        let notifier = ConsoleNotifier::new().with_sink(Arc::new(BrokenSink));
        let identity = ApplicationIdentity::default();
        notifier.notify_with_report(&identity, "", None);
        notifier.notify(&identity, "", &Failure::new("panic", None));
    }
}
