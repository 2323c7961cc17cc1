//! Host callbacks for session lifecycle events.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Callbacks the guard invokes at lifecycle points.
///
/// Implementations must be cheap and non-blocking; callbacks run on the
/// guard's timer task or on the thread that reported an auth failure. A
/// panicking callback is caught and logged and never tears down the timer.
pub trait SessionHooks: Send + Sync + 'static {
    /// The warning point was reached: `warning_offset` remains before expiry.
    fn on_warning(&self);

    /// The session ended, by idle timeout or by a reported auth failure.
    /// Fires at most once per started session.
    fn on_expire(&self);
}

pub(crate) fn invoke_warning(hooks: &Arc<dyn SessionHooks>) {
    if catch_unwind(AssertUnwindSafe(|| hooks.on_warning())).is_err() {
        tracing::error!("Session warning callback panicked");
    }
}

pub(crate) fn invoke_expire(hooks: &Arc<dyn SessionHooks>) {
    if catch_unwind(AssertUnwindSafe(|| hooks.on_expire())).is_err() {
        tracing::error!("Session expiry callback panicked");
    }
}
