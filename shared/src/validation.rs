//! Validation utilities for the Trade Analytics Dashboard
//!
//! Placeholder company names in the source data are rejected by an explicit
//! denylist rather than by generic emptiness checks.

use crate::models::MatchCriteria;

// ============================================================================
// Entity Validations
// ============================================================================

/// Names that mark a missing counterparty in the source data
pub const ENTITY_PLACEHOLDERS: &[&str] = &["unknown", "undefined"];

/// Names never profiled; `null` shows up when the loader stringifies a blank cell
pub const PROFILE_PLACEHOLDERS: &[&str] = &["unknown", "undefined", "null"];

fn is_placeholder(name: &str, denylist: &[&str]) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty()
        || denylist
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

/// A counterparty name usable in company lists and rankings
pub fn is_legitimate_entity(name: &str) -> bool {
    !is_placeholder(name, ENTITY_PLACEHOLDERS)
}

/// A supplier (or buyer) name eligible for profiling and matching
pub fn is_profile_candidate(name: &str) -> bool {
    !is_placeholder(name, PROFILE_PLACEHOLDERS)
}

// ============================================================================
// Criteria Validations
// ============================================================================

/// Validate a revenue or volume target
pub fn validate_target(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Target must be a finite number");
    }
    if value < 0.0 {
        return Err("Target cannot be negative");
    }
    Ok(())
}

/// Validate match criteria before scoring
pub fn validate_criteria(criteria: &MatchCriteria) -> Result<(), &'static str> {
    validate_target(criteria.target_revenue)?;
    validate_target(criteria.target_volume)?;
    Ok(())
}
