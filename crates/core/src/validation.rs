//! Form validation for trip creation and member registration (PRD-26).
//!
//! Field-shape rules live on the payload structs as `validator` attributes;
//! the checks that need a reference time or cross-field context are explicit
//! functions. The `validate_*` collectors return every problem at once, in
//! form order, with the exact copy the UI shows next to each field.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::eligibility::EligibilityRule;
use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum days between creating a trip and its departure.
pub const MIN_DEPARTURE_LEAD_DAYS: i64 = 3;

/// Accepted phone shape: optional leading `+`, then digits, spaces, hyphens,
/// and parentheses.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid regex"));

/// Field order for trip draft problem lists.
const TRIP_DRAFT_FIELDS: &[&str] = &[
    "title",
    "destination",
    "meeting_point",
    "description",
    "max_capacity",
];

/// Field order for registration problem lists.
const REGISTRATION_FIELDS: &[&str] = &[
    "name",
    "phone",
    "car_brand",
    "car_model",
    "car_variant",
    "car_type",
    "photos",
];

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Draft payload from the trip creation wizard.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TripDraft {
    #[validate(length(min = 3, message = "Trip title must be at least 3 characters long"))]
    pub title: String,
    #[validate(length(min = 3, message = "Destination must be at least 3 characters long"))]
    pub destination: String,
    #[validate(length(min = 5, message = "Meeting point must be at least 5 characters long"))]
    pub meeting_point: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters long"))]
    pub description: String,
    #[validate(range(min = 1, message = "Maximum capacity must be at least 1"))]
    pub max_capacity: u32,
    pub departure: Timestamp,
    #[serde(default)]
    pub rule: EligibilityRule,
}

impl TripDraft {
    /// Copy with surrounding whitespace stripped from the free-text fields.
    /// Length rules apply to the trimmed form.
    fn trimmed(&self) -> TripDraft {
        TripDraft {
            title: self.title.trim().to_string(),
            destination: self.destination.trim().to_string(),
            meeting_point: self.meeting_point.trim().to_string(),
            description: self.description.trim().to_string(),
            max_capacity: self.max_capacity,
            departure: self.departure,
            rule: self.rule.clone(),
        }
    }
}

/// Registration payload for a new member and their car.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Registration {
    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: String,
    #[validate(regex(path = *PHONE_RE, message = "Please enter a valid phone number"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Please select a car brand"))]
    pub car_brand: String,
    #[validate(length(min = 1, message = "Please select a car model"))]
    pub car_model: String,
    #[validate(length(min = 1, message = "Please select a car variant"))]
    pub car_variant: String,
    #[validate(length(min = 1, message = "Please select a car type"))]
    pub car_type: String,
    #[validate(length(min = 2, message = "Please upload at least 2 photos of your car"))]
    pub photos: Vec<String>,
}

impl Registration {
    fn trimmed(&self) -> Registration {
        let mut reg = self.clone();
        reg.name = self.name.trim().to_string();
        reg
    }
}

// ---------------------------------------------------------------------------
// Standalone checks
// ---------------------------------------------------------------------------

/// Departure must be at least [`MIN_DEPARTURE_LEAD_DAYS`] ahead of `now`.
pub fn validate_departure_lead_time(
    departure: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if departure < now + chrono::Duration::days(MIN_DEPARTURE_LEAD_DAYS) {
        return Err(CoreError::Validation(
            "Departure date must be at least 3 days in advance".to_string(),
        ));
    }
    Ok(())
}

/// The creation wizard requires at least one eligibility criterion; rules
/// only become open-to-all by clearing them after creation.
pub fn validate_rule_has_criteria(rule: &EligibilityRule) -> Result<(), CoreError> {
    if rule.is_open_to_all() {
        return Err(CoreError::Validation(
            "Please select at least one car eligibility criteria".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Collectors
// ---------------------------------------------------------------------------

/// Validate a trip draft, returning every problem at once.
pub fn validate_trip_draft(draft: &TripDraft, now: Timestamp) -> Vec<String> {
    let draft = draft.trimmed();
    let mut problems: Vec<String> = Vec::new();

    if let Err(errors) = draft.validate() {
        problems.extend(field_messages(&errors, TRIP_DRAFT_FIELDS));
    }
    if let Err(CoreError::Validation(msg)) = validate_departure_lead_time(draft.departure, now) {
        problems.push(msg);
    }
    if let Err(CoreError::Validation(msg)) = validate_rule_has_criteria(&draft.rule) {
        problems.push(msg);
    }

    problems
}

/// Validate a registration, returning every problem at once.
pub fn validate_registration(registration: &Registration) -> Vec<String> {
    match registration.trimmed().validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_messages(&errors, REGISTRATION_FIELDS),
    }
}

/// Flatten derive errors into display messages, in fixed field order.
fn field_messages(errors: &ValidationErrors, order: &[&str]) -> Vec<String> {
    let by_field = errors.field_errors();
    let mut messages = Vec::new();

    for field in order {
        if let Some(field_errors) = by_field.get(*field) {
            for error in field_errors.iter() {
                match &error.message {
                    Some(message) => messages.push(message.to_string()),
                    None => messages.push(format!("Invalid value for {field}")),
                }
            }
        }
    }

    messages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
