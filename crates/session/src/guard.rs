//! Idle-session guard (PRD-30).
//!
//! [`SessionGuard`] tracks user activity against an inactivity timeout,
//! warns shortly before the deadline, and fires an expiry callback at most
//! once per session. A single timer task serves both deadlines: it sleeps
//! for the time remaining to the next deadline, measured on the guard's
//! clock, and re-checks on wake, so a deadline made stale by an activity
//! reset simply re-arms instead of firing.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::{sleep, Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::hooks::{invoke_expire, invoke_warning, SessionHooks};

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the tracked session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session is being tracked.
    Inactive,
    /// A session is live and inside its idle window.
    Active,
    /// The warning fired; expiry is imminent unless the timer is reset.
    WarningShown,
    /// The session ended. Only [`SessionGuard::stop`] leaves this phase.
    Expired,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::WarningShown => "warning_shown",
            Self::Expired => "expired",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionGuard
// ---------------------------------------------------------------------------

struct GuardState {
    phase: SessionPhase,
    last_activity: Instant,
    hooks: Option<Arc<dyn SessionHooks>>,
    /// Token for the currently spawned timer task; replaced on every start.
    cancel: CancellationToken,
    expire_fired: bool,
}

/// Watchdog for one signed-in session.
///
/// All methods are cheap synchronous state updates; the waiting happens in
/// a background task spawned by [`start`](Self::start). Dropping the guard
/// cancels the task.
pub struct SessionGuard {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<GuardState>>,
}

impl SessionGuard {
    /// Guard running on the tokio runtime clock.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Guard with an injected time source.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        let state = GuardState {
            phase: SessionPhase::Inactive,
            last_activity: clock.now(),
            hooks: None,
            cancel: CancellationToken::new(),
            expire_fired: false,
        };
        Self {
            config,
            clock,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Begin tracking a session.
    ///
    /// Spawns the timer task on the current tokio runtime. A second call
    /// while tracking is ignored; after expiry the guard must be stopped
    /// before it can start again.
    pub fn start(&self, hooks: Arc<dyn SessionHooks>) {
        let token = {
            let mut state = self.lock_state();
            match state.phase {
                SessionPhase::Active | SessionPhase::WarningShown => {
                    tracing::warn!("Session guard already running, start ignored");
                    return;
                }
                SessionPhase::Expired => {
                    tracing::warn!("Session guard expired, stop before restarting");
                    return;
                }
                SessionPhase::Inactive => {}
            }

            state.phase = SessionPhase::Active;
            state.last_activity = self.clock.now();
            state.expire_fired = false;
            state.hooks = Some(hooks);
            state.cancel = CancellationToken::new();
            state.cancel.clone()
        };

        tracing::debug!(
            idle_timeout_secs = self.config.idle_timeout().as_secs(),
            "Session tracking started"
        );
        tokio::spawn(run_timer(
            Arc::clone(&self.state),
            self.config.clone(),
            Arc::clone(&self.clock),
            token,
        ));
    }

    /// Record user activity.
    ///
    /// Cheap enough to wire to every input event: within
    /// `activity_debounce` of the last accepted activity this is a no-op.
    /// The debounce also applies while the warning is showing, so a warning
    /// is dismissed by [`extend`](Self::extend), not by stray input.
    pub fn record_activity(&self) {
        let mut state = self.lock_state();
        if !matches!(
            state.phase,
            SessionPhase::Active | SessionPhase::WarningShown
        ) {
            return;
        }

        let now = self.clock.now();
        if now.duration_since(state.last_activity) < self.config.activity_debounce() {
            return;
        }

        state.last_activity = now;
        if state.phase == SessionPhase::WarningShown {
            state.phase = SessionPhase::Active;
            tracing::debug!("Session warning cleared by activity");
        }
    }

    /// Reset the idle clock unconditionally, bypassing the debounce. This
    /// is the warning dialog's stay-signed-in action.
    pub fn extend(&self) {
        let mut state = self.lock_state();
        if !matches!(
            state.phase,
            SessionPhase::Active | SessionPhase::WarningShown
        ) {
            return;
        }

        state.last_activity = self.clock.now();
        if state.phase == SessionPhase::WarningShown {
            state.phase = SessionPhase::Active;
        }
        tracing::debug!("Session extended");
    }

    /// Force immediate expiry after the API reported an authentication
    /// failure.
    ///
    /// Repeated calls are no-ops; the expiry callback fires at most once
    /// however the session ends.
    pub fn notify_auth_failure(&self) {
        let hooks = {
            let mut state = self.lock_state();
            if !matches!(
                state.phase,
                SessionPhase::Active | SessionPhase::WarningShown
            ) {
                return;
            }

            state.phase = SessionPhase::Expired;
            state.cancel.cancel();
            if state.expire_fired {
                None
            } else {
                state.expire_fired = true;
                state.hooks.clone()
            }
        };

        if let Some(hooks) = hooks {
            tracing::warn!("Authentication failure reported, expiring session");
            invoke_expire(&hooks);
        }
    }

    /// Stop tracking and cancel the timer task. Idempotent; after this no
    /// callback fires until the next [`start`](Self::start).
    pub fn stop(&self) {
        let mut state = self.lock_state();
        state.cancel.cancel();
        state.hooks = None;
        if state.phase != SessionPhase::Inactive {
            tracing::debug!(phase = state.phase.as_str(), "Session tracking stopped");
            state.phase = SessionPhase::Inactive;
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.lock_state().phase
    }

    /// Time left before expiry.
    ///
    /// Returns the full idle timeout while no session is tracked, and zero
    /// once expired.
    pub fn remaining(&self) -> Duration {
        let state = self.lock_state();
        match state.phase {
            SessionPhase::Inactive => self.config.idle_timeout(),
            SessionPhase::Expired => Duration::ZERO,
            SessionPhase::Active | SessionPhase::WarningShown => {
                let elapsed = self.clock.now().duration_since(state.last_activity);
                self.config.idle_timeout().saturating_sub(elapsed)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().expect("session state lock poisoned")
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Timer task
// ---------------------------------------------------------------------------

enum Callback {
    Warning(Arc<dyn SessionHooks>),
    Expire(Arc<dyn SessionHooks>),
}

/// Timer loop serving both the warning and the expiry deadline.
async fn run_timer(
    state: Arc<Mutex<GuardState>>,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
) {
    loop {
        let deadline = {
            let state = state.lock().expect("session state lock poisoned");
            match state.phase {
                SessionPhase::Active => state.last_activity + config.warning_lead(),
                SessionPhase::WarningShown => state.last_activity + config.idle_timeout(),
                SessionPhase::Inactive | SessionPhase::Expired => break,
            }
        };

        // The wait is measured on the guard's clock: an injected clock that
        // trails the runtime clock gets a fresh bounded wait on each
        // recheck instead of an immediate wake.
        let wait = deadline.duration_since(clock.now());
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Session timer cancelled");
                break;
            }
            _ = sleep(wait) => {}
        }

        let callback = {
            let mut state = state.lock().expect("session state lock poisoned");
            // A stop racing this wake must win: no callback after stop.
            if cancel.is_cancelled() {
                break;
            }

            let now = clock.now();
            match state.phase {
                SessionPhase::Active
                    if now >= state.last_activity + config.warning_lead() =>
                {
                    state.phase = SessionPhase::WarningShown;
                    state.hooks.clone().map(Callback::Warning)
                }
                SessionPhase::WarningShown
                    if now >= state.last_activity + config.idle_timeout() =>
                {
                    state.phase = SessionPhase::Expired;
                    if state.expire_fired {
                        None
                    } else {
                        state.expire_fired = true;
                        state.hooks.clone().map(Callback::Expire)
                    }
                }
                // Activity moved the deadline while we slept; re-arm.
                _ => None,
            }
        };

        match callback {
            Some(Callback::Warning(hooks)) => {
                tracing::info!("Session idle warning");
                invoke_warning(&hooks);
            }
            Some(Callback::Expire(hooks)) => {
                tracing::info!("Session expired after idle timeout");
                invoke_expire(&hooks);
            }
            None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Countdown text for the warning dialog: whole minutes and zero-padded
/// seconds, e.g. "4:59".
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
