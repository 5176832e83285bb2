//! Date coercion and period rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Asia::Taipei;

use crate::error::AppError;

/// Values that can be normalized to a calendar date. Instants discard their
/// time component.
pub trait ToReportDate {
    fn to_report_date(&self) -> NaiveDate;
}

impl ToReportDate for NaiveDate {
    fn to_report_date(&self) -> NaiveDate {
        *self
    }
}

impl ToReportDate for NaiveDateTime {
    fn to_report_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> ToReportDate for DateTime<Tz> {
    fn to_report_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Parse a calendar date or an ISO 8601 instant, normalizing instants to
/// their calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.date_naive())
        .map_err(|_| AppError::BadRequest(format!("Not a date or ISO 8601 instant: {}", value)))
}

/// The half-open upper bound passed to generators: `end + 1 day`.
pub fn end_exclusive(end: NaiveDate) -> Result<NaiveDate, AppError> {
    end.succ_opt()
        .ok_or_else(|| AppError::BadRequest(format!("End date {} is out of range", end)))
}

/// Render the query window for display: `YYYYMMDD` when start and end are
/// the same day, `YYYYMMDD-YYYYMMDD` otherwise.
pub fn render_display_period(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%Y%m%d").to_string()
    } else {
        format!("{}-{}", start.format("%Y%m%d"), end.format("%Y%m%d"))
    }
}

/// Today's date in the platform's reporting timezone (Asia/Taipei),
/// formatted with the given strftime pattern.
pub fn generate_date(format: &str) -> String {
    generate_date_at(Utc::now(), format)
}

fn generate_date_at(instant: DateTime<Utc>, format: &str) -> String {
    Taipei
        .from_utc_datetime(&instant.naive_utc())
        .format(format)
        .to_string()
}
