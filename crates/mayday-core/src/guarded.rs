//! Capability adapter
//!
//! [`Guarded`] wraps a service and routes selected operations through an
//! [`Interceptor`]. The host implements its own capability trait for
//! `Guarded<S>` by delegating each method through [`Guarded::dispatch`]:
//!
//! ```rust,ignore
//! impl Billing for Guarded<StripeBilling> {
//!     fn charge(&self, cents: u64) -> Result<Receipt, BillingError> {
//!         self.dispatch("charge", |inner| inner.charge(cents))
//!     }
//! }
//! ```
//!
//! Operations without a policy pass straight through.

use crate::error::{InterceptError, InterceptResult};
use crate::interceptor::Interceptor;
use crate::policy::PolicyTable;
use mayday_report::CallSite;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

/// A service interface whose operations can be guarded
pub trait Capability {
    /// Capability name, recorded as the owner of guarded operations
    const NAME: &'static str;

    /// Operation names that may carry a policy
    const OPERATIONS: &'static [&'static str];
}

/// Service wrapped with per-operation interception
pub struct Guarded<S> {
    inner: S,
    interceptor: Arc<Interceptor>,
    policies: PolicyTable,
}

impl<S: Capability> Guarded<S> {
    /// Wrap `inner`, checking `policies` against the capability
    ///
    /// # Errors
    /// Returns [`InterceptError::NoCapability`] if the capability exposes no
    /// operations, or [`InterceptError::UnknownOperation`] if a policy names
    /// an operation the capability lacks
    pub fn wrap(
        inner: S,
        interceptor: Arc<Interceptor>,
        policies: PolicyTable,
    ) -> InterceptResult<Self> {
        if S::OPERATIONS.is_empty() {
            return Err(InterceptError::NoCapability {
                capability: S::NAME,
            });
        }
        if let Some(unknown) = policies
            .operations()
            .find(|op| !S::OPERATIONS.iter().any(|known| known == op))
        {
            return Err(InterceptError::unknown_operation(S::NAME, unknown));
        }

        tracing::debug!(
            capability = S::NAME,
            guarded = policies.len(),
            "capability wrapped"
        );
        Ok(Self {
            inner,
            interceptor,
            policies,
        })
    }

    /// Run a fallible `&self` operation
    ///
    /// Guarded operations never return `Err`: a failure is handled by the
    /// interceptor and replaced with `Ok(T::default())`. Unguarded ones
    /// return whatever the inner service returns.
    pub fn dispatch<T, E, F>(&self, operation: &str, call: F) -> Result<T, E>
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce(&S) -> Result<T, E>,
    {
        let Some(policy) = self.policies.get(operation) else {
            return call(&self.inner);
        };
        let site = CallSite::new(S::NAME, operation);
        Ok(self.interceptor.wrap_at(&site, policy, || call(&self.inner)))
    }

    /// Run a fallible `&mut self` operation; see [`Guarded::dispatch`]
    pub fn dispatch_mut<T, E, F>(&mut self, operation: &str, call: F) -> Result<T, E>
    where
        T: Default,
        E: fmt::Display + 'static,
        F: FnOnce(&mut S) -> Result<T, E>,
    {
        let Self {
            inner,
            interceptor,
            policies,
        } = self;
        let Some(policy) = policies.get(operation) else {
            return call(inner);
        };
        let site = CallSite::new(S::NAME, operation);
        Ok(interceptor.wrap_at(&site, policy, || call(inner)))
    }

    /// Run an infallible operation, intercepting only panics
    pub fn dispatch_value<T, F>(&self, operation: &str, call: F) -> T
    where
        T: Default,
        F: FnOnce(&S) -> T,
    {
        let Some(policy) = self.policies.get(operation) else {
            return call(&self.inner);
        };
        let site = CallSite::new(S::NAME, operation);
        self.interceptor
            .wrap_at(&site, policy, || Ok::<_, Infallible>(call(&self.inner)))
    }

    /// Whether `operation` carries a policy
    #[inline]
    #[must_use]
    pub fn is_guarded(&self, operation: &str) -> bool {
        self.policies.contains(operation)
    }
}

impl<S> Guarded<S> {
    /// Wrapped service
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the service
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Policy table in use
    #[inline]
    #[must_use]
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Shared interceptor
    #[inline]
    #[must_use]
    pub fn interceptor(&self) -> &Arc<Interceptor> {
        &self.interceptor
    }
}

impl<S: fmt::Debug> fmt::Debug for Guarded<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("inner", &self.inner)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}
