//! Session lifecycle tracking for Convoy clients (PRD-30).
//!
//! This crate provides the idle-session watchdog for signed-in clients:
//!
//! - [`SessionGuard`] — the idle watchdog with warning and expiry
//!   callbacks.
//! - [`SessionConfig`] — validated idle-timeout, warning, and debounce
//!   durations.
//! - [`SessionHooks`] — host callbacks invoked on warning and expiry.
//! - [`Clock`] — injectable time source for deterministic tests.
//!
//! The guard owns all timing concerns; hosts supply a [`SessionHooks`]
//! implementation and forward raw input events to
//! [`SessionGuard::record_activity`]. Pure trip and eligibility logic
//! lives in the `convoy-core` crate.

pub mod clock;
pub mod config;
pub mod guard;
pub mod hooks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SessionConfig, SessionConfigError};
pub use guard::{format_remaining, SessionGuard, SessionPhase};
pub use hooks::SessionHooks;
