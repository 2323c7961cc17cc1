//! Session guard timing policy.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default inactivity window: 30 minutes.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default warning lead: the warning fires 5 minutes before expiry.
pub const DEFAULT_WARNING_OFFSET: Duration = Duration::from_secs(5 * 60);

/// Default minimum spacing between activity-driven timer resets.
pub const DEFAULT_ACTIVITY_DEBOUNCE: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Invalid timing policy.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    #[error("idle timeout must be non-zero")]
    ZeroIdleTimeout,

    #[error("warning offset ({warning_offset:?}) must be shorter than the idle timeout ({idle_timeout:?})")]
    WarningOffsetTooLong {
        idle_timeout: Duration,
        warning_offset: Duration,
    },
}

/// Timing policy for a [`SessionGuard`](crate::guard::SessionGuard).
///
/// Fields are private so a constructed config always satisfies
/// `warning_offset < idle_timeout`; the guard's deadline arithmetic depends
/// on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    idle_timeout: Duration,
    warning_offset: Duration,
    activity_debounce: Duration,
}

impl SessionConfig {
    /// Build a validated timing policy.
    ///
    /// `idle_timeout` must be non-zero and `warning_offset` strictly shorter
    /// than it. A zero `activity_debounce` disables debouncing.
    pub fn new(
        idle_timeout: Duration,
        warning_offset: Duration,
        activity_debounce: Duration,
    ) -> Result<Self, SessionConfigError> {
        if idle_timeout.is_zero() {
            return Err(SessionConfigError::ZeroIdleTimeout);
        }
        if warning_offset >= idle_timeout {
            return Err(SessionConfigError::WarningOffsetTooLong {
                idle_timeout,
                warning_offset,
            });
        }
        Ok(Self {
            idle_timeout,
            warning_offset,
            activity_debounce,
        })
    }

    /// Inactivity duration after which the session expires.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// How long before expiry the warning fires.
    pub fn warning_offset(&self) -> Duration {
        self.warning_offset
    }

    /// Minimum spacing between accepted activity signals.
    pub fn activity_debounce(&self) -> Duration {
        self.activity_debounce
    }

    /// Idle time after which the warning fires.
    pub fn warning_lead(&self) -> Duration {
        self.idle_timeout - self.warning_offset
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            warning_offset: DEFAULT_WARNING_OFFSET,
            activity_debounce: DEFAULT_ACTIVITY_DEBOUNCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
