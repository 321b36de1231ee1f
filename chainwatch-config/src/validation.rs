//! Custom validation functions for configuration.
//!
//! Shared validation logic used across multiple configuration modules.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateUrl, ValidationError};

lazy_static! {
    static ref RESOURCE_NAME: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._\-]{0,63}$").unwrap();
    static ref CLOCK_TIME: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref TIMEZONE: Regex = Regex::new(r"^[A-Za-z]+(/[A-Za-z0-9_+\-]+)*$").unwrap();
}

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const HTTP_METHODS: [&str; 4] = ["GET", "POST", "PUT", "PATCH"];

/// Validate a human-facing resource name (1-64 chars, no leading separator).
pub fn validate_resource_name(name: &str) -> Result<(), ValidationError> {
    if RESOURCE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_resource_name"))
    }
}

/// Validate a wall-clock time in `HH:MM` (24h) form.
pub fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    if CLOCK_TIME.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_clock_time"))
    }
}

/// Validate an IANA-style timezone name ("UTC", "Europe/Stockholm").
pub fn validate_timezone(tz: &str) -> Result<(), ValidationError> {
    if !tz.is_empty() && TIMEZONE.is_match(tz) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_timezone"))
    }
}

/// Validate day-of-week names in maintenance/skip windows.
pub fn validate_days(days: &[String]) -> Result<(), ValidationError> {
    if days
        .iter()
        .all(|d| DAY_NAMES.contains(&d.to_lowercase().as_str()))
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_day_name"))
    }
}

/// Validate an HTTP method for webhook delivery.
pub fn validate_http_method(method: &str) -> Result<(), ValidationError> {
    if HTTP_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_http_method"))
    }
}

/// Validate that every recipient looks like an e-mail address.
pub fn validate_email_list(recipients: &[String]) -> Result<(), ValidationError> {
    let plausible = |addr: &str| {
        matches!(addr.split_once('@'), Some((user, domain))
            if !user.is_empty() && domain.contains('.') && !domain.starts_with('.'))
    };
    if recipients.iter().all(|r| plausible(r)) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email_address"))
    }
}

/// Validate that every integration endpoint value is a URL.
pub fn validate_endpoint_map(endpoints: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    if endpoints.values().all(|url| url.validate_url()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_endpoint_url"))
    }
}

/// Validate that severity-map keys use the severity ladder.
pub fn validate_severity_map(map: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let valid = ["low", "medium", "high", "critical"];
    if map.keys().all(|k| valid.contains(&k.to_lowercase().as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_severity"))
    }
}
