//! Checks a raw report submission against the domain rules.
//!
//! Rules run in a fixed order and the first failure is returned, so a caller
//! only ever sees one problem at a time:
//!
//! 1. required fields are present
//! 2. `waste_type` is a known literal
//! 3. `description` fits in [`MAX_DESCRIPTION_LEN`] characters
//! 4. `severity`, when given, is a known literal
//! 5. coordinates parse as finite numbers

use thiserror::Error;

use crate::features::reports::models::{
    RawReportSubmission, Severity, ValidatedReportRequest, WasteType, MAX_DESCRIPTION_LEN,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid {field} '{value}'. Must be one of: {allowed}")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("{field} must be {max} characters or less (got {actual})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Invalid {field} '{value}': must be a finite number")]
    InvalidCoordinate { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidEnum { field, .. }
            | ValidationError::FieldTooLong { field, .. }
            | ValidationError::InvalidCoordinate { field, .. } => field,
        }
    }
}

/// Validate and normalize a submission. Pure and deterministic.
pub fn validate(raw: &RawReportSubmission) -> Result<ValidatedReportRequest, ValidationError> {
    // 1. presence
    let user_id = raw
        .user_id
        .ok_or(ValidationError::MissingField { field: "user_id" })?;
    let latitude = required(&raw.latitude, "latitude")?;
    let longitude = required(&raw.longitude, "longitude")?;
    let photo_path = required(&raw.photo_path, "photo_path")?;
    let waste_type = literal(&raw.waste_type).ok_or(ValidationError::MissingField {
        field: "waste_type",
    })?;

    // 2. waste type
    let waste_type =
        WasteType::from_literal(waste_type).ok_or_else(|| ValidationError::InvalidEnum {
            field: "waste_type",
            value: waste_type.to_string(),
            allowed: join_literals(WasteType::ALL.iter().map(WasteType::as_str)),
        })?;

    // 3. description length
    let description = optional(&raw.description);
    if let Some(text) = description {
        let actual = text.chars().count();
        if actual > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
                actual,
            });
        }
    }

    // 4. severity
    let severity = match literal(&raw.severity) {
        None => None,
        Some(value) => Some(Severity::from_literal(value).ok_or_else(|| {
            ValidationError::InvalidEnum {
                field: "severity",
                value: value.to_string(),
                allowed: join_literals(Severity::ALL.iter().map(Severity::as_str)),
            }
        })?),
    };

    // 5. coordinates
    let latitude = coordinate(latitude, "latitude")?;
    let longitude = coordinate(longitude, "longitude")?;

    Ok(ValidatedReportRequest {
        user_id,
        username: optional(&raw.username).map(str::to_string),
        latitude,
        longitude,
        readable_area: optional(&raw.readable_area).map(str::to_string),
        photo_path: photo_path.to_string(),
        waste_type,
        description: description.map(str::to_string),
        severity,
        landmark: optional(&raw.landmark).map(str::to_string),
    })
}

/// Trimmed value of a required field; blank counts as missing
fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    optional(value).ok_or(ValidationError::MissingField { field })
}

/// Trimmed value, with blank collapsed to `None`
fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Untrimmed value of an enum field; literals must match exactly
fn literal(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn coordinate(value: &str, field: &'static str) -> Result<f64, ValidationError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

fn join_literals<'a>(literals: impl Iterator<Item = &'a str>) -> String {
    literals.collect::<Vec<_>>().join(", ")
}
