//! Settings and property validation.
//!
//! # Responsibilities
//! - Semantic validation of `SyncSettings` (serde handles syntactic)
//! - Registry of per-property checks for the tracked ConfigMap
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: input → Result<(), Vec<ValidationError>>
//! - New ConfigMap properties register a check in `PROPERTY_CHECKS` instead
//!   of validating at their call sites

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::schema::SyncSettings;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("property '{key}' is invalid: {reason}")]
    InvalidProperty { key: String, reason: String },
}

/// Check applied to the value of one ConfigMap property.
pub type PropertyCheck = fn(&str) -> Result<(), String>;

/// Checks keyed by property name. Empty until a property needs one.
pub const PROPERTY_CHECKS: &[(&str, PropertyCheck)] = &[];

/// Validate sync settings, collecting every failure.
pub fn validate_settings(settings: &SyncSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let level = settings.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            settings.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Run `checks` against the properties present in `data`.
pub fn validate_properties(
    data: &BTreeMap<String, String>,
    checks: &[(&str, PropertyCheck)],
) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<_> = checks
        .iter()
        .filter_map(|(key, check)| {
            let value = data.get(*key)?;
            check(value).err().map(|reason| ValidationError::InvalidProperty {
                key: (*key).to_string(),
                reason,
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
