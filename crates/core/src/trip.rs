//! Trip roster state and join/leave authorization (PRD-22).
//!
//! Join and leave checks are pure decision functions over pre-loaded data.
//! They return an explicit decision enum rather than a bare bool so callers
//! can surface the exact denial reason; the checks run in a fixed order and
//! the first failure wins.

use serde::{Deserialize, Serialize};

use crate::eligibility::{car_matches_rule, EligibilityRule};
use crate::profile::UserProfile;
use crate::types::{Timestamp, TripId, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum gap between leaving a trip and its departure, in hours.
pub const LEAVE_CUTOFF_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// A scheduled road trip with its roster and eligibility rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    /// The member who published the trip.
    pub organizer: UserId,
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub meeting_point: String,
    #[serde(default)]
    pub description: String,
    /// Maximum roster size. A zero capacity denies every join.
    pub max_capacity: u32,
    /// Confirmed participants. The join check rejects duplicates, so entries
    /// stay unique as long as joins go through [`evaluate_join`].
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub rule: EligibilityRule,
    /// Scheduled departure (UTC).
    pub departure: Timestamp,
}

impl Trip {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_capacity as usize
    }

    /// Open seats left on the roster.
    pub fn spots_remaining(&self) -> u32 {
        (self.max_capacity as usize).saturating_sub(self.participants.len()) as u32
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Whether the trip has not yet departed.
    pub fn is_upcoming(&self, now: Timestamp) -> bool {
        self.departure > now
    }
}

// ---------------------------------------------------------------------------
// Join authorization
// ---------------------------------------------------------------------------

/// Outcome of a join authorization check.
///
/// Denial variants are listed in evaluation order: an existing membership is
/// reported before a full roster, which is reported before car eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinDecision {
    /// The user is already on the roster.
    AlreadyJoined,
    /// The roster has reached capacity.
    TripFull,
    /// The user's car does not satisfy the eligibility rule.
    IneligibleCar,
    /// All checks passed; the caller may perform the join.
    Eligible,
}

impl JoinDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Denial message for display, `None` when the join is allowed.
    pub fn denial_reason(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyJoined => Some("You are already participating in this trip"),
            Self::TripFull => Some("This trip is full"),
            Self::IneligibleCar => {
                Some("Your car does not meet the eligibility criteria for this trip")
            }
            Self::Eligible => None,
        }
    }
}

/// Authorize a join request.
pub fn evaluate_join(user: &UserProfile, trip: &Trip) -> JoinDecision {
    if trip.is_participant(&user.id) {
        return JoinDecision::AlreadyJoined;
    }
    if trip.is_full() {
        return JoinDecision::TripFull;
    }
    if !car_matches_rule(&user.car, &trip.rule) {
        return JoinDecision::IneligibleCar;
    }
    JoinDecision::Eligible
}

/// Strict conjunction of the join checks.
pub fn can_join_trip(user: &UserProfile, trip: &Trip) -> bool {
    evaluate_join(user, trip).is_allowed()
}

// ---------------------------------------------------------------------------
// Leave authorization
// ---------------------------------------------------------------------------

/// Outcome of a leave authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// The user is not on the roster.
    NotParticipant,
    /// Departure is within [`LEAVE_CUTOFF_HOURS`].
    TooCloseToDeparture,
    /// The user may leave the trip.
    Allowed,
}

impl LeaveDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Denial message for display, `None` when leaving is allowed.
    pub fn denial_reason(&self) -> Option<&'static str> {
        match self {
            Self::NotParticipant => Some("You are not participating in this trip"),
            Self::TooCloseToDeparture => {
                Some("Cannot leave a trip less than 24 hours before departure")
            }
            Self::Allowed => None,
        }
    }
}

/// Authorize leaving a trip.
///
/// The cutoff is inclusive: a departure exactly [`LEAVE_CUTOFF_HOURS`] away
/// is already too close.
pub fn evaluate_leave(trip: &Trip, user_id: &str, now: Timestamp) -> LeaveDecision {
    if !trip.is_participant(user_id) {
        return LeaveDecision::NotParticipant;
    }
    if trip.departure <= now + chrono::Duration::hours(LEAVE_CUTOFF_HOURS) {
        return LeaveDecision::TooCloseToDeparture;
    }
    LeaveDecision::Allowed
}

// ---------------------------------------------------------------------------
// List helpers
// ---------------------------------------------------------------------------

/// Case-insensitive search over title, destination, description, and
/// organizer. An empty query keeps every trip.
pub fn filter_by_search<'a>(trips: &'a [Trip], query: &str) -> Vec<&'a Trip> {
    if query.is_empty() {
        return trips.iter().collect();
    }

    let query = query.to_lowercase();
    trips
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&query)
                || t.destination.to_lowercase().contains(&query)
                || t.description.to_lowercase().contains(&query)
                || t.organizer.to_lowercase().contains(&query)
        })
        .collect()
}

/// Order trips by departure, soonest first.
pub fn sort_by_departure(trips: &mut [Trip]) {
    trips.sort_by_key(|t| t.departure);
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Roster summary for trip cards.
pub fn spots_remaining_text(trip: &Trip) -> String {
    match trip.spots_remaining() {
        0 => "Trip Full".to_string(),
        1 => "1 spot remaining".to_string(),
        n => format!("{n} spots remaining"),
    }
}

/// Relative departure label for trip cards.
///
/// The remaining time is rounded up to whole days, so any departure still
/// ahead of `now` reads as at least "Tomorrow"; "Today" covers departures up
/// to a day in the past.
pub fn days_until_text(departure: Timestamp, now: Timestamp) -> String {
    let secs = (departure - now).num_seconds();
    // Ceiling division; `/` already rounds toward zero for negative values.
    let days = if secs > 0 {
        (secs + 86_399) / 86_400
    } else {
        secs / 86_400
    };

    if days < 0 {
        return "Trip completed".to_string();
    }
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => format!("{n} days"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CarProfile;
    use crate::tier::Tier;
    use chrono::TimeZone;

    fn at(hour: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    fn porsche_driver(id: &str) -> UserProfile {
        UserProfile::new(
            id,
            Tier::Free,
            CarProfile::new("Porsche", "911", "911 GT3", "Coupe"),
        )
    }

    fn trip_with(participants: &[&str], max_capacity: u32, brands: &[&str]) -> Trip {
        Trip {
            id: "t-1".to_string(),
            organizer: "u-organizer".to_string(),
            title: "Alpine Pass Run".to_string(),
            destination: "Stelvio".to_string(),
            meeting_point: "Fuel station A1".to_string(),
            description: "Two days of mountain passes".to_string(),
            max_capacity,
            participants: participants.iter().map(|s| s.to_string()).collect(),
            rule: EligibilityRule {
                brands: brands.iter().map(|s| s.to_string()).collect(),
                models: vec![],
                types: vec![],
            },
            departure: at(12),
        }
    }

    // -- evaluate_join --------------------------------------------------------

    #[test]
    fn join_allowed_when_all_checks_pass() {
        let trip = trip_with(&["u-2"], 4, &["Porsche"]);
        let decision = evaluate_join(&porsche_driver("u-1"), &trip);
        assert_eq!(decision, JoinDecision::Eligible);
        assert!(decision.is_allowed());
        assert_eq!(decision.denial_reason(), None);
    }

    #[test]
    fn duplicate_join_rejected_first() {
        // Even with open seats and a matching car.
        let trip = trip_with(&["u-1"], 4, &["Porsche"]);
        assert_eq!(
            evaluate_join(&porsche_driver("u-1"), &trip),
            JoinDecision::AlreadyJoined
        );

        // Roster full and car ineligible too; membership still wins.
        let trip = trip_with(&["u-1", "u-2"], 2, &["BMW"]);
        assert_eq!(
            evaluate_join(&porsche_driver("u-1"), &trip),
            JoinDecision::AlreadyJoined
        );
    }

    #[test]
    fn full_trip_rejected_before_eligibility() {
        // A matching car does not get around a full roster.
        let trip = trip_with(&["u-2", "u-3"], 2, &["Porsche"]);
        assert_eq!(
            evaluate_join(&porsche_driver("u-1"), &trip),
            JoinDecision::TripFull
        );

        let trip = trip_with(&["u-2", "u-3"], 2, &["BMW"]);
        assert_eq!(
            evaluate_join(&porsche_driver("u-1"), &trip),
            JoinDecision::TripFull
        );
    }

    #[test]
    fn ineligible_car_rejected_last() {
        let trip = trip_with(&["u-2"], 4, &["BMW"]);
        let decision = evaluate_join(&porsche_driver("u-1"), &trip);
        assert_eq!(decision, JoinDecision::IneligibleCar);
        assert_eq!(
            decision.denial_reason(),
            Some("Your car does not meet the eligibility criteria for this trip")
        );
    }

    #[test]
    fn zero_capacity_trip_denies_every_join() {
        let trip = trip_with(&[], 0, &[]);
        assert_eq!(
            evaluate_join(&porsche_driver("u-1"), &trip),
            JoinDecision::TripFull
        );
    }

    #[test]
    fn open_rule_trip_admits_any_car() {
        let trip = trip_with(&[], 4, &[]);
        let mut user = porsche_driver("u-1");
        user.car = CarProfile::default();
        assert!(can_join_trip(&user, &trip));
    }

    // -- evaluate_leave -------------------------------------------------------

    #[test]
    fn leave_allowed_well_before_departure() {
        let mut trip = trip_with(&["u-1"], 4, &[]);
        trip.departure = at(12);
        // 36 hours before departure.
        let now = chrono::Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap();
        assert_eq!(evaluate_leave(&trip, "u-1", now), LeaveDecision::Allowed);
    }

    #[test]
    fn leave_rejected_within_cutoff() {
        let mut trip = trip_with(&["u-1"], 4, &[]);
        trip.departure = at(12);
        // 23 hours before departure.
        let now = chrono::Utc.with_ymd_and_hms(2025, 5, 31, 13, 0, 0).unwrap();
        let decision = evaluate_leave(&trip, "u-1", now);
        assert_eq!(decision, LeaveDecision::TooCloseToDeparture);
        assert_eq!(
            decision.denial_reason(),
            Some("Cannot leave a trip less than 24 hours before departure")
        );
    }

    #[test]
    fn leave_rejected_exactly_at_cutoff() {
        let mut trip = trip_with(&["u-1"], 4, &[]);
        trip.departure = at(12);
        let now = chrono::Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap();
        assert_eq!(
            evaluate_leave(&trip, "u-1", now),
            LeaveDecision::TooCloseToDeparture
        );
    }

    #[test]
    fn leave_rejected_for_non_participant() {
        let trip = trip_with(&["u-2"], 4, &[]);
        let now = chrono::Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(
            evaluate_leave(&trip, "u-1", now),
            LeaveDecision::NotParticipant
        );
    }

    // -- roster helpers -------------------------------------------------------

    #[test]
    fn spots_remaining_saturates_at_zero() {
        let trip = trip_with(&["u-1", "u-2", "u-3"], 2, &[]);
        assert!(trip.is_full());
        assert_eq!(trip.spots_remaining(), 0);
    }

    #[test]
    fn spots_remaining_text_variants() {
        assert_eq!(spots_remaining_text(&trip_with(&["u-1"], 1, &[])), "Trip Full");
        assert_eq!(
            spots_remaining_text(&trip_with(&["u-1"], 2, &[])),
            "1 spot remaining"
        );
        assert_eq!(
            spots_remaining_text(&trip_with(&[], 4, &[])),
            "4 spots remaining"
        );
    }

    #[test]
    fn upcoming_is_strict() {
        let trip = trip_with(&[], 4, &[]);
        assert!(trip.is_upcoming(at(11)));
        assert!(!trip.is_upcoming(at(12)));
        assert!(!trip.is_upcoming(at(13)));
    }

    // -- list helpers ---------------------------------------------------------

    #[test]
    fn search_matches_any_text_field() {
        let mut alpine = trip_with(&[], 4, &[]);
        alpine.title = "Alpine Pass Run".to_string();
        let mut coastal = trip_with(&[], 4, &[]);
        coastal.id = "t-2".to_string();
        coastal.title = "Coastal Cruise".to_string();
        coastal.destination = "Amalfi".to_string();
        let trips = vec![alpine, coastal];

        let hits = filter_by_search(&trips, "amalfi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t-2");

        let all = filter_by_search(&trips, "");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn sort_orders_by_departure_ascending() {
        let mut late = trip_with(&[], 4, &[]);
        late.departure = at(18);
        let mut early = trip_with(&[], 4, &[]);
        early.id = "t-2".to_string();
        early.departure = at(6);
        let mut trips = vec![late, early];

        sort_by_departure(&mut trips);
        assert_eq!(trips[0].id, "t-2");
    }

    // -- days_until_text ------------------------------------------------------

    #[test]
    fn days_until_labels() {
        let now = at(12);
        assert_eq!(days_until_text(at(13), now), "Tomorrow");
        assert_eq!(
            days_until_text(now + chrono::Duration::days(5), now),
            "5 days"
        );
        assert_eq!(days_until_text(now, now), "Today");
        assert_eq!(
            days_until_text(now - chrono::Duration::hours(3), now),
            "Today"
        );
        assert_eq!(
            days_until_text(now - chrono::Duration::days(2), now),
            "Trip completed"
        );
    }
}
