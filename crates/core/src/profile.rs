//! Member and car profile types shared by the eligibility and quota checks.

use serde::{Deserialize, Serialize};

use crate::tier::Tier;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// The car attached to a member's registration.
///
/// Fields may be empty while a registration is incomplete. An empty field
/// never matches a non-empty eligibility set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarProfile {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub car_type: String,
}

impl CarProfile {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        variant: impl Into<String>,
        car_type: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            variant: variant.into(),
            car_type: car_type.into(),
        }
    }

    /// Display name for profile cards, e.g. "Porsche 911 GT3".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.variant)
    }
}

/// Per-period usage counters, reset externally at the period boundary.
///
/// A missing counter deserializes as zero, so a first-time member starts
/// with full quota headroom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Trips created in the current quota period.
    #[serde(default)]
    pub trips_created: u32,
    /// Trip notifications received in the current quota period.
    #[serde(default)]
    pub notifications_received: u32,
}

impl UsageCounters {
    /// Count a created trip against the period quota.
    pub fn record_trip_created(&mut self) {
        self.trips_created = self.trips_created.saturating_add(1);
    }

    /// Count a received notification against the period quota.
    pub fn record_notification_received(&mut self) {
        self.notifications_received = self.notifications_received.saturating_add(1);
    }
}

/// A registered member with their car, subscription tier, and usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub car: CarProfile,
    #[serde(default)]
    pub usage: UsageCounters,
    /// Engagement points balance (see [`crate::points`]).
    #[serde(default)]
    pub points: u32,
}

impl UserProfile {
    /// A fresh profile with zeroed usage and points.
    pub fn new(id: impl Into<UserId>, tier: Tier, car: CarProfile) -> Self {
        Self {
            id: id.into(),
            tier,
            car,
            usage: UsageCounters::default(),
            points: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
