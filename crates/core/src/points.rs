//! Engagement points awarded for platform actions (PRD-23).

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Actions that award engagement points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsAction {
    CreateTrip,
    JoinTrip,
    CompleteTrip,
    VerifyCar,
    InviteFriend,
}

impl PointsAction {
    /// Parse from an action string; unknown actions award nothing, so this
    /// returns `None` rather than defaulting.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "create_trip" => Some(Self::CreateTrip),
            "join_trip" => Some(Self::JoinTrip),
            "complete_trip" => Some(Self::CompleteTrip),
            "verify_car" => Some(Self::VerifyCar),
            "invite_friend" => Some(Self::InviteFriend),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTrip => "create_trip",
            Self::JoinTrip => "join_trip",
            Self::CompleteTrip => "complete_trip",
            Self::VerifyCar => "verify_car",
            Self::InviteFriend => "invite_friend",
        }
    }

    /// Points awarded for this action.
    pub fn value(&self) -> u32 {
        match self {
            Self::CreateTrip => 50,
            Self::JoinTrip => 20,
            Self::CompleteTrip => 30,
            Self::VerifyCar => 25,
            Self::InviteFriend => 40,
        }
    }
}

/// Add the award for `action` to the user's balance.
pub fn award_points(user: &mut UserProfile, action: PointsAction) {
    user.points = user.points.saturating_add(action.value());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
