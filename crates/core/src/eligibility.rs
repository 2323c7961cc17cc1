//! Car eligibility rules and trip matching (PRD-21).
//!
//! An [`EligibilityRule`] lists the acceptable cars for a trip, one set per
//! category. Matching is deliberately permissive: a car qualifies by hitting
//! any one category, and a rule with no criteria at all admits every car.

use serde::{Deserialize, Serialize};

use crate::profile::CarProfile;

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// Car eligibility criteria attached to a trip.
///
/// Each set lists acceptable values for one category. An empty set places no
/// constraint on its category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRule {
    /// Acceptable car brands.
    #[serde(default)]
    pub brands: Vec<String>,
    /// Acceptable specific model variants.
    #[serde(default)]
    pub models: Vec<String>,
    /// Acceptable car types.
    #[serde(default)]
    pub types: Vec<String>,
}

impl EligibilityRule {
    /// True when no criteria are set, meaning the trip is open to every car.
    pub fn is_open_to_all(&self) -> bool {
        self.brands.is_empty() && self.models.is_empty() && self.types.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Check whether a car satisfies an eligibility rule.
///
/// An all-empty rule admits every car. Otherwise the car qualifies by
/// matching any one listed category: its brand against `brands`, its variant
/// against `models`, or its type against `types`. Comparison is exact string
/// equality; an empty car field never matches a non-empty set.
pub fn car_matches_rule(car: &CarProfile, rule: &EligibilityRule) -> bool {
    if rule.is_open_to_all() {
        return true;
    }

    rule.brands.iter().any(|b| *b == car.brand)
        || rule.models.iter().any(|m| *m == car.variant)
        || rule.types.iter().any(|t| *t == car.car_type)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// One-line summary of a rule's criteria for trip cards.
pub fn summarize_rule(rule: &EligibilityRule) -> String {
    let mut criteria: Vec<String> = Vec::new();

    if !rule.brands.is_empty() {
        if rule.brands.len() == 1 {
            criteria.push(format!("All {}s", rule.brands[0]));
        } else {
            let last = rule.brands.len() - 1;
            criteria.push(format!(
                "{} & {}",
                rule.brands[..last].join(", "),
                rule.brands[last]
            ));
        }
    }

    if !rule.models.is_empty() {
        if rule.models.len() <= 3 {
            criteria.push(rule.models.join(", "));
        } else {
            criteria.push(format!(
                "{} + {} more",
                rule.models[..2].join(", "),
                rule.models.len() - 2
            ));
        }
    }

    if !rule.types.is_empty() {
        if rule.types.len() <= 2 {
            criteria.push(format!("All {}s", rule.types.join(" & ")));
        } else {
            criteria.push(format!(
                "{} + {} more types",
                rule.types[..2].join(", "),
                rule.types.len() - 2
            ));
        }
    }

    if criteria.is_empty() {
        return "All cars welcome".to_string();
    }
    criteria.join(" \u{2022} ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
