//! Per-tier quota checks (PRD-20).
//!
//! Pure decision functions over a profile's usage counters and a
//! [`TierPolicies`] table. Counter maintenance (incrementing on create,
//! resetting at the period boundary) is the caller's responsibility.

use crate::profile::UserProfile;
use crate::tier::{Tier, TierPolicies};

/// Whether the user may create another trip this period.
///
/// Requires the tier to allow trip creation at all, then compares the
/// period counter against the tier limit. An unlimited policy always
/// passes.
pub fn can_create_trip(user: &UserProfile, policies: &TierPolicies) -> bool {
    let policy = policies.resolve(user.tier);
    if !policy.can_create_trips {
        return false;
    }
    match policy.monthly_trip_limit {
        Some(limit) => user.usage.trips_created < limit,
        None => true,
    }
}

/// Whether the user may receive another trip notification this period.
pub fn can_receive_notification(user: &UserProfile, policies: &TierPolicies) -> bool {
    let policy = policies.resolve(user.tier);
    match policy.monthly_notification_limit {
        Some(limit) => user.usage.notifications_received < limit,
        None => true,
    }
}

/// Whether to show the upgrade prompt.
///
/// Only free-tier users are ever prompted, and only once a period counter
/// has reached its limit.
pub fn should_prompt_upgrade(user: &UserProfile, policies: &TierPolicies) -> bool {
    if user.tier != Tier::Free {
        return false;
    }

    let policy = policies.resolve(user.tier);
    let trips_exhausted = policy
        .monthly_trip_limit
        .is_some_and(|limit| user.usage.trips_created >= limit);
    let notifications_exhausted = policy
        .monthly_notification_limit
        .is_some_and(|limit| user.usage.notifications_received >= limit);

    trips_exhausted || notifications_exhausted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CarProfile;
    use crate::tier::{TierPolicies, TierPolicy};
    use std::collections::HashMap;

    fn user(tier: Tier) -> UserProfile {
        UserProfile::new("u-1", tier, CarProfile::default())
    }

    // -- can_create_trip ------------------------------------------------------

    #[test]
    fn free_tier_cannot_create() {
        let policies = TierPolicies::default();
        assert!(!can_create_trip(&user(Tier::Free), &policies));
    }

    #[test]
    fn unknown_tier_string_gets_free_limits() {
        let policies = TierPolicies::default();
        let member = user(Tier::from_str_value("platinum"));
        assert!(!can_create_trip(&member, &policies));
    }

    #[test]
    fn paid_tier_creates_without_limit() {
        let policies = TierPolicies::default();
        let mut premium = user(Tier::PremiumMonthly);
        premium.usage.trips_created = 500;
        assert!(can_create_trip(&premium, &policies));
    }

    #[test]
    fn creation_stops_at_limit() {
        let mut map = HashMap::new();
        map.insert(
            Tier::Free,
            TierPolicy {
                monthly_trip_limit: Some(2),
                monthly_notification_limit: Some(2),
                can_create_trips: true,
            },
        );
        let policies = TierPolicies::new(map);

        let mut member = user(Tier::Free);
        assert!(can_create_trip(&member, &policies));
        member.usage.record_trip_created();
        assert!(can_create_trip(&member, &policies));
        member.usage.record_trip_created();
        assert!(!can_create_trip(&member, &policies));
    }

    #[test]
    fn creation_flag_overrides_remaining_quota() {
        // can_create_trips false denies even with the counter at zero.
        let policies = TierPolicies::default();
        let member = user(Tier::Free);
        assert_eq!(member.usage.trips_created, 0);
        assert!(!can_create_trip(&member, &policies));
    }

    // -- can_receive_notification ---------------------------------------------

    #[test]
    fn notifications_stop_at_free_limit() {
        let policies = TierPolicies::default();
        let mut member = user(Tier::Free);
        assert!(can_receive_notification(&member, &policies));

        member.usage.record_notification_received();
        assert!(can_receive_notification(&member, &policies));

        member.usage.record_notification_received();
        assert!(!can_receive_notification(&member, &policies));
    }

    #[test]
    fn paid_tier_notifications_unlimited() {
        let policies = TierPolicies::default();
        let mut premium = user(Tier::PremiumYearly);
        premium.usage.notifications_received = 10_000;
        assert!(can_receive_notification(&premium, &policies));
    }

    // -- should_prompt_upgrade ------------------------------------------------

    #[test]
    fn no_prompt_below_quota() {
        let policies = TierPolicies::default();
        assert!(!should_prompt_upgrade(&user(Tier::Free), &policies));
    }

    #[test]
    fn prompt_when_trip_quota_reached() {
        let policies = TierPolicies::default();
        let mut member = user(Tier::Free);
        member.usage.trips_created = 1;
        assert!(should_prompt_upgrade(&member, &policies));
    }

    #[test]
    fn prompt_when_notification_quota_reached() {
        let policies = TierPolicies::default();
        let mut member = user(Tier::Free);
        member.usage.notifications_received = 2;
        assert!(should_prompt_upgrade(&member, &policies));
    }

    #[test]
    fn paid_tiers_never_prompted() {
        let policies = TierPolicies::default();
        for tier in [Tier::PremiumMonthly, Tier::PremiumYearly, Tier::Admin] {
            let mut member = user(tier);
            member.usage.trips_created = 99;
            member.usage.notifications_received = 99;
            assert!(!should_prompt_upgrade(&member, &policies));
        }
    }
}
