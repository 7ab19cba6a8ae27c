//! Field validators
//!
//! Pure predicates for the date, email and phone formats used by the entity
//! editing commands. They never fail; callers decide how to report a `false`.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Priority;

/// Date format used by every dated field (`DD-MM-YYYY`)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Date-time format used for note timestamps (`DD-MM-YYYY HH:MM:SS`)
pub const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid date regex"));
static DATETIME_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2}$").expect("valid datetime regex")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("valid phone regex"));

/// Check a `DD-MM-YYYY` date, or `DD-MM-YYYY HH:MM:SS` when `with_time` is set
///
/// The value must also denote a real calendar date (no 31 April, no 29
/// February outside leap years) and a real time of day.
pub fn validate_date(s: &str, with_time: bool) -> bool {
    if with_time {
        DATETIME_SHAPE_RE.is_match(s) && NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).is_ok()
    } else {
        parse_date(s).is_some()
    }
}

/// Parse a `DD-MM-YYYY` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Check an email address: local part, `@`, domain, and a TLD of 2+ letters
pub fn validate_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Check a phone number: optional leading `+`, then 10+ digits, spaces or hyphens
pub fn validate_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Check a task priority, returning its canonical form
pub fn validate_priority(s: &str) -> Option<Priority> {
    s.parse().ok()
}
