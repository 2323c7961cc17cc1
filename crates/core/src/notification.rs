//! Trip notification taxonomy, message builders, and fan-out targeting
//! (PRD-24).
//!
//! Builders produce the canonical notification copy for each event; the
//! fan-out helpers compute who should receive it. Delivery and unread-badge
//! state live with the caller.

use serde::{Deserialize, Serialize};

use crate::eligibility::car_matches_rule;
use crate::profile::UserProfile;
use crate::quota::can_receive_notification;
use crate::tier::TierPolicies;
use crate::trip::Trip;
use crate::types::{Timestamp, TripId, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Valid notification kind strings.
pub const KIND_NEW_TRIP: &str = "new_trip";
pub const KIND_TRIP_UPDATED: &str = "trip_updated";
pub const KIND_TRIP_CANCELLED: &str = "trip_cancelled";
pub const KIND_JOIN_REQUEST: &str = "join_request";
pub const KIND_REQUEST_APPROVED: &str = "request_approved";
pub const KIND_REQUEST_DECLINED: &str = "request_declined";
pub const KIND_PARTICIPANT_JOINED: &str = "participant_joined";
pub const KIND_PARTICIPANT_LEFT: &str = "participant_left";
pub const KIND_TRIP_REMINDER: &str = "trip_reminder";

/// All valid notification kind strings.
pub const VALID_NOTIFICATION_KINDS: &[&str] = &[
    KIND_NEW_TRIP,
    KIND_TRIP_UPDATED,
    KIND_TRIP_CANCELLED,
    KIND_JOIN_REQUEST,
    KIND_REQUEST_APPROVED,
    KIND_REQUEST_DECLINED,
    KIND_PARTICIPANT_JOINED,
    KIND_PARTICIPANT_LEFT,
    KIND_TRIP_REMINDER,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of a trip notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewTrip,
    TripUpdated,
    TripCancelled,
    JoinRequest,
    RequestApproved,
    RequestDeclined,
    ParticipantJoined,
    ParticipantLeft,
    TripReminder,
}

impl NotificationKind {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            KIND_NEW_TRIP => Ok(Self::NewTrip),
            KIND_TRIP_UPDATED => Ok(Self::TripUpdated),
            KIND_TRIP_CANCELLED => Ok(Self::TripCancelled),
            KIND_JOIN_REQUEST => Ok(Self::JoinRequest),
            KIND_REQUEST_APPROVED => Ok(Self::RequestApproved),
            KIND_REQUEST_DECLINED => Ok(Self::RequestDeclined),
            KIND_PARTICIPANT_JOINED => Ok(Self::ParticipantJoined),
            KIND_PARTICIPANT_LEFT => Ok(Self::ParticipantLeft),
            KIND_TRIP_REMINDER => Ok(Self::TripReminder),
            _ => Err(format!(
                "Invalid notification kind '{s}'. Must be one of: {}",
                VALID_NOTIFICATION_KINDS.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewTrip => KIND_NEW_TRIP,
            Self::TripUpdated => KIND_TRIP_UPDATED,
            Self::TripCancelled => KIND_TRIP_CANCELLED,
            Self::JoinRequest => KIND_JOIN_REQUEST,
            Self::RequestApproved => KIND_REQUEST_APPROVED,
            Self::RequestDeclined => KIND_REQUEST_DECLINED,
            Self::ParticipantJoined => KIND_PARTICIPANT_JOINED,
            Self::ParticipantLeft => KIND_PARTICIPANT_LEFT,
            Self::TripReminder => KIND_TRIP_REMINDER,
        }
    }

    /// Human-readable label for the notification center.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewTrip => "New Trip Available",
            Self::TripUpdated => "Trip Updated",
            Self::TripCancelled => "Trip Cancelled",
            Self::JoinRequest => "Join Request",
            Self::RequestApproved => "Request Approved",
            Self::RequestDeclined => "Request Declined",
            Self::ParticipantJoined => "New Participant",
            Self::ParticipantLeft => "Participant Left",
            Self::TripReminder => "Trip Reminder",
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// A notification delivered to a member about a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripNotification {
    pub recipient: UserId,
    pub trip_id: TripId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// The member whose action triggered this, when there is one.
    #[serde(default)]
    pub related_user: Option<UserId>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Announcement for a freshly published trip.
pub fn new_trip_notification(
    recipient: UserId,
    trip: &Trip,
    organizer_name: &str,
    now: Timestamp,
) -> TripNotification {
    TripNotification {
        recipient,
        trip_id: trip.id.clone(),
        kind: NotificationKind::NewTrip,
        title: format!("New trip available: {}", trip.title),
        message: format!(
            "A new trip to {} has been organized by {organizer_name}. \
             Check if you're interested in joining!",
            trip.destination
        ),
        related_user: Some(trip.organizer.clone()),
        is_read: false,
        created_at: now,
    }
}

/// Sent to participants when the organizer edits trip details.
pub fn trip_updated_notification(
    recipient: UserId,
    trip: &Trip,
    now: Timestamp,
) -> TripNotification {
    TripNotification {
        recipient,
        trip_id: trip.id.clone(),
        kind: NotificationKind::TripUpdated,
        title: format!("Trip updated: {}", trip.title),
        message: format!(
            "The trip '{}' has been updated by the organizer. \
             Please check the latest details.",
            trip.title
        ),
        related_user: Some(trip.organizer.clone()),
        is_read: false,
        created_at: now,
    }
}

/// Sent to the organizer when a member joins their trip.
pub fn participant_joined_notification(
    trip: &Trip,
    participant: UserId,
    participant_name: &str,
    now: Timestamp,
) -> TripNotification {
    TripNotification {
        recipient: trip.organizer.clone(),
        trip_id: trip.id.clone(),
        kind: NotificationKind::ParticipantJoined,
        title: format!("{participant_name} joined your trip"),
        message: format!(
            "{participant_name} has joined your trip '{}'",
            trip.title
        ),
        related_user: Some(participant),
        is_read: false,
        created_at: now,
    }
}

/// Sent to the organizer when a member leaves their trip.
pub fn participant_left_notification(
    trip: &Trip,
    participant: UserId,
    participant_name: &str,
    now: Timestamp,
) -> TripNotification {
    TripNotification {
        recipient: trip.organizer.clone(),
        trip_id: trip.id.clone(),
        kind: NotificationKind::ParticipantLeft,
        title: format!("{participant_name} left your trip"),
        message: format!(
            "{participant_name} has left your trip '{}'",
            trip.title
        ),
        related_user: Some(participant),
        is_read: false,
        created_at: now,
    }
}

/// Sent to a participant when the organizer resolves their request.
pub fn participation_status_notification(
    recipient: UserId,
    trip: &Trip,
    approved: bool,
    now: Timestamp,
) -> TripNotification {
    let (kind, status) = if approved {
        (NotificationKind::RequestApproved, "confirmed")
    } else {
        (NotificationKind::RequestDeclined, "declined")
    };
    TripNotification {
        recipient,
        trip_id: trip.id.clone(),
        kind,
        title: format!("Trip participation {status}"),
        message: format!(
            "Your participation in '{}' has been {status}",
            trip.title
        ),
        related_user: Some(trip.organizer.clone()),
        is_read: false,
        created_at: now,
    }
}

/// Day-before reminder for a confirmed participant.
pub fn trip_reminder_notification(
    recipient: UserId,
    trip: &Trip,
    now: Timestamp,
) -> TripNotification {
    TripNotification {
        recipient,
        trip_id: trip.id.clone(),
        kind: NotificationKind::TripReminder,
        title: format!("Trip reminder: {}", trip.title),
        message: format!(
            "Your trip '{}' starts tomorrow at {}. Meeting point: {}",
            trip.title,
            trip.departure.format("%I:%M %p"),
            trip.meeting_point
        ),
        related_user: Some(trip.organizer.clone()),
        is_read: false,
        created_at: now,
    }
}

// ---------------------------------------------------------------------------
// Fan-out targeting
// ---------------------------------------------------------------------------

/// Members to notify about a freshly published trip.
///
/// Excludes the organizer, cars that do not satisfy the rule, and members
/// whose notification quota for the period is spent.
pub fn new_trip_recipients<'a>(
    trip: &Trip,
    users: &'a [UserProfile],
    policies: &TierPolicies,
) -> Vec<&'a UserProfile> {
    users
        .iter()
        .filter(|u| u.id != trip.organizer)
        .filter(|u| car_matches_rule(&u.car, &trip.rule))
        .filter(|u| can_receive_notification(u, policies))
        .collect()
}

/// Unread notifications for the badge counter.
pub fn unread_count(notifications: &[TripNotification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::EligibilityRule;
    use crate::profile::CarProfile;
    use crate::tier::Tier;
    use chrono::TimeZone;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 6, 1, 19, 30, 0).unwrap()
    }

    fn trip() -> Trip {
        Trip {
            id: "t-1".to_string(),
            organizer: "u-organizer".to_string(),
            title: "Alpine Pass Run".to_string(),
            destination: "Stelvio".to_string(),
            meeting_point: "Fuel station A1".to_string(),
            description: "Two days of mountain passes".to_string(),
            max_capacity: 6,
            participants: vec![],
            rule: EligibilityRule {
                brands: vec!["Porsche".to_string()],
                models: vec![],
                types: vec![],
            },
            departure: chrono::Utc.with_ymd_and_hms(2025, 6, 2, 19, 30, 0).unwrap(),
        }
    }

    // -- NotificationKind -----------------------------------------------------

    #[test]
    fn kind_round_trip() {
        for s in VALID_NOTIFICATION_KINDS {
            assert_eq!(NotificationKind::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn invalid_kind_rejected() {
        let result = NotificationKind::from_str_value("carrier_pigeon");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid notification kind"));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(NotificationKind::NewTrip.label(), "New Trip Available");
        assert_eq!(NotificationKind::ParticipantJoined.label(), "New Participant");
    }

    // -- builders -------------------------------------------------------------

    #[test]
    fn new_trip_copy() {
        let n = new_trip_notification("u-5".to_string(), &trip(), "Alex", now());
        assert_eq!(n.kind, NotificationKind::NewTrip);
        assert_eq!(n.title, "New trip available: Alpine Pass Run");
        assert_eq!(
            n.message,
            "A new trip to Stelvio has been organized by Alex. \
             Check if you're interested in joining!"
        );
        assert_eq!(n.related_user.as_deref(), Some("u-organizer"));
        assert!(!n.is_read);
    }

    #[test]
    fn joined_notification_targets_organizer() {
        let n = participant_joined_notification(&trip(), "u-5".to_string(), "Sam", now());
        assert_eq!(n.recipient, "u-organizer");
        assert_eq!(n.title, "Sam joined your trip");
        assert_eq!(n.message, "Sam has joined your trip 'Alpine Pass Run'");
        assert_eq!(n.related_user.as_deref(), Some("u-5"));
    }

    #[test]
    fn status_notification_wording() {
        let approved =
            participation_status_notification("u-5".to_string(), &trip(), true, now());
        assert_eq!(approved.kind, NotificationKind::RequestApproved);
        assert_eq!(approved.title, "Trip participation confirmed");

        let declined =
            participation_status_notification("u-5".to_string(), &trip(), false, now());
        assert_eq!(declined.kind, NotificationKind::RequestDeclined);
        assert_eq!(
            declined.message,
            "Your participation in 'Alpine Pass Run' has been declined"
        );
    }

    #[test]
    fn reminder_includes_time_and_meeting_point() {
        let n = trip_reminder_notification("u-5".to_string(), &trip(), now());
        assert_eq!(
            n.message,
            "Your trip 'Alpine Pass Run' starts tomorrow at 07:30 PM. \
             Meeting point: Fuel station A1"
        );
    }

    // -- fan-out --------------------------------------------------------------

    #[test]
    fn fan_out_filters_organizer_eligibility_and_quota() {
        let policies = TierPolicies::default();
        let porsche = CarProfile::new("Porsche", "911", "911 GT3", "Coupe");

        let organizer = UserProfile::new("u-organizer", Tier::PremiumMonthly, porsche.clone());
        let eligible = UserProfile::new("u-1", Tier::PremiumMonthly, porsche.clone());
        let wrong_car = UserProfile::new(
            "u-2",
            Tier::PremiumMonthly,
            CarProfile::new("BMW", "M3", "M3 Competition", "Sedan"),
        );
        let mut quota_spent = UserProfile::new("u-3", Tier::Free, porsche);
        quota_spent.usage.notifications_received = 2;

        let users = vec![organizer, eligible, wrong_car, quota_spent];
        let recipients = new_trip_recipients(&trip(), &users, &policies);

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].id, "u-1");
    }

    #[test]
    fn open_trip_fan_out_still_excludes_organizer() {
        let policies = TierPolicies::default();
        let mut open_trip = trip();
        open_trip.rule = EligibilityRule::default();

        let users = vec![
            UserProfile::new("u-organizer", Tier::PremiumMonthly, CarProfile::default()),
            UserProfile::new("u-1", Tier::PremiumMonthly, CarProfile::default()),
        ];
        let recipients = new_trip_recipients(&open_trip, &users, &policies);
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].id, "u-1");
    }

    #[test]
    fn unread_count_ignores_read_entries() {
        let mut read = new_trip_notification("u-5".to_string(), &trip(), "Alex", now());
        read.is_read = true;
        let unread = trip_updated_notification("u-5".to_string(), &trip(), now());
        assert_eq!(unread_count(&[read, unread]), 1);
    }
}
