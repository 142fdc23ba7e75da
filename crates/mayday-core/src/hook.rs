//! Quiet panic capture
//!
//! A process-wide hook is chained in front of whatever hook was installed
//! before the first guarded call. While the current thread is inside
//! [`catch_quietly`] the default `thread '..' panicked at` output is
//! suppressed; everywhere else the previous hook runs unchanged.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static INSTALL: Once = Once::new();

fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_DEPTH.with(Cell::get) == 0 {
                previous(info);
            }
        }));
        tracing::trace!("quiet panic hook installed");
    });
}

struct Scope;

impl Scope {
    fn enter() -> Self {
        QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        QUIET_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f`, catching any panic without printing the default panic message
pub(crate) fn catch_quietly<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    install();
    let _scope = Scope::enter();
    panic::catch_unwind(AssertUnwindSafe(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_quiet() -> bool {
        QUIET_DEPTH.with(Cell::get) > 0
    }

    #[test]
    fn panic_is_caught_and_scope_is_left() {
        let caught = catch_quietly(|| -> u8 { panic!("hidden") });
        assert!(caught.is_err());
        assert!(!is_quiet());
    }

    #[test]
    fn nested_scopes_unwind_to_zero() {
        let outer = catch_quietly(|| {
            assert!(is_quiet());
            let inner = catch_quietly(|| -> u8 { panic!("inner") });
            assert!(inner.is_err());
            assert!(is_quiet());
            7
        });
        assert_eq!(outer.ok(), Some(7));
        assert!(!is_quiet());
    }
}
