//! Subscription tiers and per-tier quota policies (PRD-20).
//!
//! Tier resolution is centralized here: every quota decision goes through
//! [`TierPolicies::resolve`], and an unrecognized or missing tier resolves
//! to the free policy, the most restrictive one, so checks keep answering
//! instead of failing on unexpected account data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Valid tier strings as stored by the accounts service.
pub const TIER_FREE: &str = "free";
pub const TIER_PREMIUM_MONTHLY: &str = "premium_monthly";
pub const TIER_PREMIUM_YEARLY: &str = "premium_yearly";
pub const TIER_ENTERPRISE: &str = "enterprise";
pub const TIER_ADMIN: &str = "admin";

/// All valid tier strings.
pub const VALID_TIERS: &[&str] = &[
    TIER_FREE,
    TIER_PREMIUM_MONTHLY,
    TIER_PREMIUM_YEARLY,
    TIER_ENTERPRISE,
    TIER_ADMIN,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Subscription tier of a member account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Tier {
    #[default]
    Free,
    PremiumMonthly,
    PremiumYearly,
    Enterprise,
    Admin,
}

impl Tier {
    /// Parse from an account-service string.
    ///
    /// Unknown values fall back to `Free`; an unrecognized tier must never
    /// grant more access than a known one.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            TIER_PREMIUM_MONTHLY => Self::PremiumMonthly,
            TIER_PREMIUM_YEARLY => Self::PremiumYearly,
            TIER_ENTERPRISE => Self::Enterprise,
            TIER_ADMIN => Self::Admin,
            _ => Self::Free,
        }
    }

    /// Convert to the account-service string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => TIER_FREE,
            Self::PremiumMonthly => TIER_PREMIUM_MONTHLY,
            Self::PremiumYearly => TIER_PREMIUM_YEARLY,
            Self::Enterprise => TIER_ENTERPRISE,
            Self::Admin => TIER_ADMIN,
        }
    }

    /// Whether this is a paying (or otherwise privileged) tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Free)
    }
}

// Deserialization routes through the same fallback as `from_str_value`, so
// profile payloads carrying a tier this build does not know about still parse.
impl From<String> for Tier {
    fn from(s: String) -> Self {
        Self::from_str_value(&s)
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Quota policy attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Trips a member may create per quota period. `None` means unlimited.
    pub monthly_trip_limit: Option<u32>,
    /// Notifications a member may receive per quota period. `None` means
    /// unlimited.
    pub monthly_notification_limit: Option<u32>,
    /// Whether the tier may create trips at all.
    pub can_create_trips: bool,
}

/// Policy applied when a table defines neither the requested tier nor free.
const FALLBACK_POLICY: TierPolicy = TierPolicy {
    monthly_trip_limit: Some(0),
    monthly_notification_limit: Some(0),
    can_create_trips: false,
};

/// Launch tier table: free members browse and join but cannot create, paid
/// tiers are unlimited.
pub const DEFAULT_TIER_POLICIES: &[(Tier, TierPolicy)] = &[
    (
        Tier::Free,
        TierPolicy {
            monthly_trip_limit: Some(1),
            monthly_notification_limit: Some(2),
            can_create_trips: false,
        },
    ),
    (
        Tier::PremiumMonthly,
        TierPolicy {
            monthly_trip_limit: None,
            monthly_notification_limit: None,
            can_create_trips: true,
        },
    ),
    (
        Tier::PremiumYearly,
        TierPolicy {
            monthly_trip_limit: None,
            monthly_notification_limit: None,
            can_create_trips: true,
        },
    ),
    (
        Tier::Enterprise,
        TierPolicy {
            monthly_trip_limit: None,
            monthly_notification_limit: None,
            can_create_trips: true,
        },
    ),
    (
        Tier::Admin,
        TierPolicy {
            monthly_trip_limit: None,
            monthly_notification_limit: None,
            can_create_trips: true,
        },
    ),
];

/// Per-tier policy table, passed into quota checks as static configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierPolicies {
    policies: HashMap<Tier, TierPolicy>,
}

impl TierPolicies {
    /// Build a table from explicit entries.
    pub fn new(policies: HashMap<Tier, TierPolicy>) -> Self {
        Self { policies }
    }

    /// Resolve the policy for a tier.
    ///
    /// Falls back to the free entry when the tier is not in the table, and
    /// to a deny-everything policy when free is missing too.
    pub fn resolve(&self, tier: Tier) -> TierPolicy {
        self.policies
            .get(&tier)
            .or_else(|| self.policies.get(&Tier::Free))
            .copied()
            .unwrap_or(FALLBACK_POLICY)
    }
}

impl Default for TierPolicies {
    fn default() -> Self {
        Self {
            policies: DEFAULT_TIER_POLICIES.iter().copied().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
