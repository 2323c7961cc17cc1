//! Convoy domain logic: tiers, eligibility, trips, and notifications.
//!
//! This crate holds the pure decision logic shared by every Convoy client
//! surface:
//!
//! - [`eligibility`] — car-to-trip matching rules.
//! - [`trip`] — roster state plus join/leave authorization.
//! - [`quota`] — per-tier creation and notification limits.
//! - [`notification`] — notification taxonomy, copy, and fan-out targeting.
//! - [`validation`] — form validation for trip drafts and registrations.
//! - [`points`] — engagement point awards.
//!
//! Everything here is deterministic and I/O-free. Functions that depend on
//! the current time take it as an argument; the async session machinery
//! lives in the `convoy-session` crate.

pub mod eligibility;
pub mod error;
pub mod notification;
pub mod points;
pub mod profile;
pub mod quota;
pub mod tier;
pub mod trip;
pub mod types;
pub mod validation;

pub use eligibility::{car_matches_rule, summarize_rule, EligibilityRule};
pub use error::CoreError;
pub use notification::{NotificationKind, TripNotification};
pub use points::PointsAction;
pub use profile::{CarProfile, UsageCounters, UserProfile};
pub use quota::{can_create_trip, can_receive_notification, should_prompt_upgrade};
pub use tier::{Tier, TierPolicies, TierPolicy};
pub use trip::{
    can_join_trip, evaluate_join, evaluate_leave, JoinDecision, LeaveDecision, Trip,
};
pub use types::{Timestamp, TripId, UserId};
pub use validation::{
    validate_registration, validate_trip_draft, Registration, TripDraft,
};
