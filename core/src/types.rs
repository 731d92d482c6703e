//! Shared primitive types used across the service.

use crate::error::{ShipError, ShipResult};
use chrono::NaiveDate;

/// Campus-issued student identifier (`uc_student_uid`).
pub type StudentUid = String;

/// Generated row id of a visit.
pub type VisitId = i64;

/// Generated row id of a prediction.
pub type PredictionId = i64;

/// Every date column is stored as ISO `YYYY-MM-DD` text so that string
/// comparison in SQL orders the same way as the calendar.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO date, rejecting anything that is not `YYYY-MM-DD`.
///
/// `%Y-%m-%d` alone also takes `2025-9-5` and `+2025-09-05`, so the value
/// must round-trip to the same text.
pub fn parse_iso_date(field: &str, value: &str) -> ShipResult<NaiveDate> {
    let invalid = || {
        ShipError::validation(format!(
            "{field} must be an ISO date (YYYY-MM-DD), got '{value}'"
        ))
    };
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(invalid());
    }
    Ok(date)
}

/// The accumulation window of one plan year. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTerm {
    pub year_label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}
