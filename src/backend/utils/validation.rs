// src/backend/utils/validation.rs
use crate::error::CareError;
use chrono::NaiveDate;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Format of the calendar day keys used by schedule events.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Runs the derived validation rules of a request before anything is written.
pub fn validate_input<T: Validate>(req: &T) -> Result<(), CareError> {
    req.validate().map_err(CareError::from)
}

/// Rejects empty and whitespace-only form fields.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

/// Accepts ISO calendar-day keys such as `2024-05-01`.
pub fn valid_date_key(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, DATE_KEY_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            let mut err = ValidationError::new("date_key");
            err.message = Some(Cow::Borrowed("expected a YYYY-MM-DD date"));
            err
        })
}
