//! Error types module
//!
//! This module provides the core error types used throughout the report
//! platform. All errors are unified under the `AppError` enum which covers
//! request validation, report resolution, generation, mailing, and internal
//! failures.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNKNOWN_REPORT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request fields: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Report {0} is in the catalog but has no registered generator")]
    ReportDrift(String),

    #[error("Report has no valid data: {0}")]
    EmptyReport(String),

    #[error("Unsupported report frequency: {0}")]
    ReportFrequency(String),

    #[error("Report generation failed")]
    Generation {
        report: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Report generation exceeded {0} seconds")]
    GenerationTimeout(u64),

    #[error("Mail delivery failed: {0}")]
    Mailing(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_offending_fields(&err, &mut fields);
        fields.sort();
        fields.dedup();
        AppError::Validation { fields }
    }
}

/// Flatten a validation error tree into field names. Nested structs are
/// walked so a flattened request body reports its inner fields directly;
/// schema-level checks (registered under "__all__") are surfaced under the
/// field named by their error code.
fn collect_offending_fields(err: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in err.errors() {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                if *field == "__all__" {
                    out.extend(errors.iter().map(|e| e.code.to_string()));
                } else {
                    out.push(field.to_string());
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_offending_fields(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_offending_fields(inner, out);
                }
            }
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Validation { .. } => (
            422,
            "VALIDATION_ERROR",
            false,
            Some("Check the listed fields and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnknownReport(_) => (
            404,
            "UNKNOWN_REPORT",
            false,
            Some("List available reports via GET /reports"),
            false,
            LogLevel::Debug,
        ),
        AppError::ReportDrift(_) => (
            500,
            "REPORT_DRIFT",
            false,
            Some("Contact the report platform maintainers"),
            true,
            LogLevel::Error,
        ),
        AppError::EmptyReport(_) => (
            204,
            "EMPTY_REPORT",
            false,
            Some("Widen the query period or verify the organization"),
            false,
            LogLevel::Debug,
        ),
        AppError::ReportFrequency(_) => (
            400,
            "FREQUENCY_ERROR",
            false,
            Some("Adjust the query period to the report's frequency"),
            false,
            LogLevel::Debug,
        ),
        AppError::Generation { .. } => (
            500,
            "GENERATION_ERROR",
            false,
            Some("Contact the report's point of contact"),
            true,
            LogLevel::Error,
        ),
        AppError::GenerationTimeout(_) => (
            504,
            "GENERATION_TIMEOUT",
            true,
            Some("Narrow the query period and retry"),
            false,
            LogLevel::Warn,
        ),
        AppError::Mailing(_) => (
            500,
            "MAILING_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation { .. } => "Validation",
            AppError::UnknownReport(_) => "UnknownReport",
            AppError::ReportDrift(_) => "ReportDrift",
            AppError::EmptyReport(_) => "EmptyReport",
            AppError::ReportFrequency(_) => "ReportFrequency",
            AppError::Generation { .. } => "Generation",
            AppError::GenerationTimeout(_) => "GenerationTimeout",
            AppError::Mailing(_) => "Mailing",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Offending fields for validation errors; empty for everything else.
    pub fn fields(&self) -> &[String] {
        match self {
            AppError::Validation { fields } => fields,
            _ => &[],
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation { fields } => {
                format!("Invalid request fields: {}", fields.join(", "))
            }
            AppError::UnknownReport(ref name) => format!("Unknown report: {}", name),
            AppError::ReportDrift(_) => "Report generator unavailable".to_string(),
            AppError::EmptyReport(ref msg) => msg.clone(),
            AppError::ReportFrequency(ref msg) => msg.clone(),
            AppError::Generation { ref report, .. } => {
                format!("Failed to generate report {}", report)
            }
            AppError::GenerationTimeout(secs) => {
                format!("Report generation exceeded {} seconds", secs)
            }
            AppError::Mailing(_) => "Failed to send the report by e-mail".to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::Validation {
            fields: vec!["org".to_string(), "request_id".to_string()],
        };
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Invalid request fields: org, request_id");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_unknown_report() {
        let err = AppError::UnknownReport("pain_level".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_REPORT");
        assert_eq!(err.client_message(), "Unknown report: pain_level");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_generation_is_redacted() {
        let err = AppError::Generation {
            report: "fall_events".to_string(),
            source: anyhow::anyhow!("division by zero in sheet builder"),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "GENERATION_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to generate report fall_events");
        assert!(err.detailed_message().contains("division by zero"));
    }

    #[test]
    fn test_error_metadata_empty_report_maps_to_204() {
        let err = AppError::EmptyReport("no valid rows for the period".to_string());
        assert_eq!(err.http_status_code(), 204);
        assert_eq!(err.error_code(), "EMPTY_REPORT");
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_timeout() {
        let err = AppError::GenerationTimeout(300);
        assert_eq!(err.http_status_code(), 504);
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_from_validation_errors_collects_fields() {
        use validator::Validate;

        #[derive(Debug, validator::Validate)]
        struct Probe {
            #[validate(length(equal = 24))]
            org: String,
            #[validate(length(min = 1))]
            user_id: String,
        }

        let probe = Probe {
            org: "short".to_string(),
            user_id: String::new(),
        };
        let err: AppError = probe.validate().unwrap_err().into();
        assert_eq!(err.fields(), &["org".to_string(), "user_id".to_string()]);
    }
}
