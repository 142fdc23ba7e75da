//! Failure interception
//!
//! ```text
//! operation ──Ok──────────────────────────────────────────────▶ Completed(value)
//!     │
//!     └─Err / panic ─▶ Failure ─▶ create_report? ─yes─▶ build + persist ─▶ notify_with_report
//!                                        │
//!                                        └─no──▶ notify
//!                             ─▶ print_raw_trace? ─▶ trace sink
//!                             ─▶ exit_code != 0 ? ─▶ Terminate { code } : Recovered(default)
//! ```
//!
//! `notify*` calls are skipped when the policy is silent. Nothing that
//! happens while handling a failure escapes to the caller.

use crate::hook::catch_quietly;
use crate::policy::InterceptPolicy;
use crate::terminator::{ProcessExit, Terminator};
use mayday_identity::{
    package_manifest, ApplicationIdentity, ExplicitSource, IdentityCell, MetadataResolver,
    ResolverConfig,
};
use mayday_notify::{emit_trace, ConsoleNotifier, Notify, OutputSink, StderrSink};
use mayday_report::{CallSite, CrashReporter, Failure, ReportConfig, Reporter};
use std::fmt;
use std::sync::Arc;

/// Outcome of an intercepted operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intercepted<T> {
    /// Operation succeeded; value is untouched
    Completed(T),
    /// Operation failed and was handled; value is the substitute
    Recovered(T),
    /// Operation failed and the policy asks to end the process
    Terminate {
        /// Requested exit code
        code: i32,
    },
}

impl<T> Intercepted<T> {
    /// Whether the operation succeeded
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Requested exit code, if any
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Terminate { code } => Some(*code),
            _ => None,
        }
    }

    /// Value carried by a completed or recovered outcome
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Completed(value) | Self::Recovered(value) => Some(value),
            Self::Terminate { .. } => None,
        }
    }
}

/// Turns failures of guarded operations into reports and notices
///
/// Stateless apart from its collaborators; safe to share across threads.
pub struct Interceptor {
    identity: Arc<IdentityCell>,
    reporter: Arc<dyn Reporter>,
    notifier: Arc<dyn Notify>,
    trace_sink: Arc<dyn OutputSink>,
    terminator: Arc<dyn Terminator>,
}

impl Interceptor {
    /// Start building an interceptor
    #[inline]
    #[must_use]
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::new()
    }

    /// Identity used for reports and notices
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &Arc<IdentityCell> {
        &self.identity
    }

    /// Run `operation` under `policy`, returning the substitute on failure
    ///
    /// When the policy has a nonzero exit code the configured
    /// [`Terminator`] runs after all side effects.
    pub fn wrap<T, E, F>(&self, policy: &InterceptPolicy, operation: F) -> T
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let outcome = self.run(None, policy, operation);
        self.settle(outcome)
    }

    /// [`Interceptor::wrap`] recording the guarded operation in the report
    pub fn wrap_at<T, E, F>(&self, call_site: &CallSite, policy: &InterceptPolicy, operation: F) -> T
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let outcome = self.run(Some(call_site), policy, operation);
        self.settle(outcome)
    }

    /// Run `operation` under `policy` without ever terminating
    pub fn intercept<T, E, F>(&self, policy: &InterceptPolicy, operation: F) -> Intercepted<T>
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        self.run(None, policy, operation)
    }

    /// [`Interceptor::intercept`] recording the guarded operation in the report
    pub fn intercept_at<T, E, F>(
        &self,
        call_site: &CallSite,
        policy: &InterceptPolicy,
        operation: F,
    ) -> Intercepted<T>
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        self.run(Some(call_site), policy, operation)
    }

    fn run<T, E, F>(
        &self,
        call_site: Option<&CallSite>,
        policy: &InterceptPolicy,
        operation: F,
    ) -> Intercepted<T>
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let failure = match catch_quietly(operation) {
            Ok(Ok(value)) => return Intercepted::Completed(value),
            Ok(Err(error)) => Failure::from_error(&error),
            Err(payload) => Failure::from_panic(payload.as_ref()),
        }
        .capture_backtrace();

        self.handle(call_site, policy, &failure);

        if policy.terminates() {
            Intercepted::Terminate {
                code: policy.exit_code,
            }
        } else {
            Intercepted::Recovered(T::default())
        }
    }

    /// Report, notify and trace; panics from collaborators are contained
    fn handle(&self, call_site: Option<&CallSite>, policy: &InterceptPolicy, failure: &Failure) {
        let operation = call_site.map(ToString::to_string).unwrap_or_default();
        tracing::debug!(cause = %failure, operation = %operation, "intercepted failure");

        let handled = catch_quietly(|| {
            let identity = self.identity.current();
            self.report_and_notify(&identity, call_site, policy, failure);
            if policy.print_raw_trace {
                emit_trace(self.trace_sink.as_ref(), failure);
            }
        });
        if handled.is_err() {
            tracing::error!(cause = %failure, "crash handling panicked");
        }
    }

    fn report_and_notify(
        &self,
        identity: &ApplicationIdentity,
        call_site: Option<&CallSite>,
        policy: &InterceptPolicy,
        failure: &Failure,
    ) {
        let message = policy.resolved_message();
        if policy.create_report {
            let report = self.reporter.build(identity, failure, call_site);
            let path = self.reporter.persist(&report);
            if !policy.silent {
                self.notifier
                    .notify_with_report(identity, message, path.as_deref());
            }
        } else if !policy.silent {
            self.notifier.notify(identity, message, failure);
        }
    }

    fn settle<T: Default>(&self, outcome: Intercepted<T>) -> T {
        match outcome {
            Intercepted::Completed(value) | Intercepted::Recovered(value) => value,
            Intercepted::Terminate { code } => {
                self.terminator.terminate(code);
                T::default()
            }
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("identity", &self.identity)
            .field("trace_sink", &self.trace_sink)
            .field("terminator", &self.terminator)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Interceptor`]
///
/// Unset collaborators fall back to: identity resolved from the working
/// directory and `APP_*` variables, reports under `MAYDAY_REPORT_DIR` or
/// `crash-reports`, notices and traces on stderr, [`ProcessExit`].
#[derive(Default)]
pub struct InterceptorBuilder {
    identity: Option<Arc<IdentityCell>>,
    reporter: Option<Arc<dyn Reporter>>,
    notifier: Option<Arc<dyn Notify>>,
    trace_sink: Option<Arc<dyn OutputSink>>,
    terminator: Option<Arc<dyn Terminator>>,
}

impl InterceptorBuilder {
    /// Create builder with every collaborator unset
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With shared identity cell
    #[inline]
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<IdentityCell>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// With identity resolved lazily through `resolver`
    #[inline]
    #[must_use]
    pub fn with_resolver(self, resolver: MetadataResolver) -> Self {
        self.with_identity(Arc::new(IdentityCell::new(resolver)))
    }

    /// With a fixed identity
    #[inline]
    #[must_use]
    pub fn with_fixed_identity(self, identity: ApplicationIdentity) -> Self {
        self.with_identity(Arc::new(IdentityCell::fixed(identity)))
    }

    /// With report builder
    #[inline]
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// With notifier
    #[inline]
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// With sink for raw traces
    #[inline]
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    /// With termination hook
    #[inline]
    #[must_use]
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Build the interceptor
    #[must_use]
    pub fn build(self) -> Interceptor {
        let identity = self.identity.unwrap_or_else(|| {
            Arc::new(IdentityCell::new(MetadataResolver::standard(
                &ResolverConfig::new(),
                ExplicitSource::from_env(),
                Some(package_manifest!()),
            )))
        });
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(CrashReporter::new(ReportConfig::from_env())));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(ConsoleNotifier::new()));
        let trace_sink = self.trace_sink.unwrap_or_else(|| Arc::new(StderrSink));
        let terminator = self.terminator.unwrap_or_else(|| Arc::new(ProcessExit));

        Interceptor {
            identity,
            reporter,
            notifier,
            trace_sink,
            terminator,
        }
    }
}

impl fmt::Debug for InterceptorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorBuilder")
            .field("identity", &self.identity)
            .field("reporter", &self.reporter.is_some())
            .field("notifier", &self.notifier.is_some())
            .field("trace_sink", &self.trace_sink)
            .field("terminator", &self.terminator)
            .finish()
    }
}
