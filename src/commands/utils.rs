use chrono::NaiveDate;

use crate::{error::AppError, models::DateRange};

/// Trims an optional form field, treating blank text as absent.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Trims a required form field, rejecting blank text with `message`.
pub(crate) fn require_text(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::message(message));
    }
    Ok(trimmed.to_string())
}

pub fn date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<DateRange, AppError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::message("Start date must not be after end date."));
        }
    }
    Ok(DateRange { from, to })
}
