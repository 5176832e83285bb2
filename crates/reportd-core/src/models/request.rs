//! Report generation request model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A validated report generation request.
///
/// `request_id` and `org` are opaque 24-character ObjectId-like strings
/// minted by the caller. `suffix` is passed to the generator verbatim; the
/// core does not interpret it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_period"))]
#[schema(example = json!({
    "request_id": "63dca63d3c66277a83076999",
    "user_id": "userIdProvidedByFrontend",
    "request_at": "2023-02-01T08:00:00Z",
    "org": "5c10bdf47b43650f407de7d6",
    "start": "2023-01-01",
    "end": "2023-01-31",
    "suffix": "{\"key\": \"value\"}"
}))]
pub struct ReportRequest {
    /// 24 character ObjectId-like identifier minted by the caller.
    #[validate(custom(function = "validate_object_id"))]
    pub request_id: String,
    /// The logged-in user's ID.
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Request time recorded by the front-end service.
    pub request_at: DateTime<Utc>,
    /// 24 character ObjectId-like organization identifier.
    #[validate(custom(function = "validate_object_id"))]
    pub org: String,
    /// Start date of the query period.
    pub start: NaiveDate,
    /// End date of the query period (inclusive; the dispatcher passes
    /// `end + 1 day` to the generator).
    pub end: NaiveDate,
    /// Additional parameters passed to the generator verbatim,
    /// conventionally a JSON-like string.
    #[serde(default)]
    pub suffix: Option<String>,
}

/// Length-only check: the original platform accepts any 24 character
/// identifier, not just hex digits.
pub fn validate_object_id(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() == 24 {
        Ok(())
    } else {
        let mut err = ValidationError::new("object_id");
        err.message = Some("must be a 24 character ObjectId-like string".into());
        Err(err)
    }
}

fn validate_period(request: &ReportRequest) -> Result<(), ValidationError> {
    if request.end < request.start {
        // Reported under the "end" field in the error response.
        let mut err = ValidationError::new("end");
        err.message = Some("end date must not be earlier than start date".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;

    fn valid_request() -> ReportRequest {
        ReportRequest {
            request_id: "63dca63d3c66277a83076999".to_string(),
            user_id: "nurse-01".to_string(),
            request_at: "2023-02-01T08:00:00Z".parse().unwrap(),
            org: "5c10bdf47b43650f407de7d6".to_string(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            suffix: None,
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_short_org_and_names_only_that_field() {
        let mut request = valid_request();
        request.org = "short".to_string();
        let err: AppError = request.validate().unwrap_err().into();
        assert_eq!(err.fields(), &["org".to_string()]);
    }

    #[test]
    fn rejects_empty_user_id() {
        let mut request = valid_request();
        request.user_id = String::new();
        let err: AppError = request.validate().unwrap_err().into();
        assert_eq!(err.fields(), &["user_id".to_string()]);
    }

    #[test]
    fn rejects_inverted_period() {
        let mut request = valid_request();
        request.end = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        let err: AppError = request.validate().unwrap_err().into();
        assert_eq!(err.fields(), &["end".to_string()]);
    }

    #[test]
    fn enumerates_every_offending_field() {
        let mut request = valid_request();
        request.request_id = "nope".to_string();
        request.org = "also-nope".to_string();
        request.user_id = String::new();
        let err: AppError = request.validate().unwrap_err().into();
        assert_eq!(
            err.fields(),
            &[
                "org".to_string(),
                "request_id".to_string(),
                "user_id".to_string()
            ]
        );
    }

    #[test]
    fn suffix_is_accepted_verbatim() {
        let mut request = valid_request();
        request.suffix = Some("{\"branch\": \"north\"}".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn single_day_period_is_valid() {
        let mut request = valid_request();
        request.end = request.start;
        assert!(request.validate().is_ok());
    }
}
