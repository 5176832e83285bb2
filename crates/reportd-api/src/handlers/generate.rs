//! Report generation endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use reportd_core::reporting::{generate_date, render_display_period};
use reportd_core::{AppError, Artifact, ArtifactKind, ReportRequest};

use crate::dispatch::dispatch;
use crate::error::HttpAppError;
use crate::services::mail_delivery::deliver_by_mail;
use crate::state::AppState;

/// Body for `POST /report/generate`: the report request plus routing.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_mail_sink"))]
pub struct GenerateReportBody {
    /// Catalog id of the report to generate.
    #[validate(length(min = 1))]
    pub report_name: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub request: ReportRequest,

    /// Deliver the artifact to this address as a mail attachment.
    #[validate(email)]
    pub mail_to: Option<String>,

    /// When set, mail is the only sink; the response carries no artifact.
    /// Requires `mail_to`.
    #[serde(default)]
    pub mail_only: bool,
}

fn validate_mail_sink(body: &GenerateReportBody) -> Result<(), ValidationError> {
    if body.mail_only && body.mail_to.is_none() {
        // Reported under the "mail_to" field in the error response.
        let mut err = ValidationError::new("mail_to");
        err.message = Some("mail_only requires a mail_to recipient".into());
        return Err(err);
    }
    Ok(())
}

/// Generate a report for the requested organization and period.
#[utoipa::path(
    post,
    path = "/report/generate",
    request_body = GenerateReportBody,
    responses(
        (status = 200, description = "Generated report artifact", content_type = "application/octet-stream"),
        (status = 204, description = "No data in the requested period"),
        (status = 400, description = "Report frequency mismatch", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown report", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failure with offending fields", body = crate::error::ErrorResponse),
        (status = 500, description = "Generation failure", body = crate::error::ErrorResponse),
        (status = 504, description = "Generation timed out", body = crate::error::ErrorResponse)
    ),
    tag = "reports"
)]
#[tracing::instrument(skip(state, body), fields(report = %body.report_name, request_id = %body.request.request_id))]
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateReportBody>,
) -> Result<Response, HttpAppError> {
    body.validate().map_err(HttpAppError::from)?;

    let started = Instant::now();
    let request = &body.request;
    let period = render_display_period(request.start, request.end);

    let outcome = dispatch(&state, &body.report_name, request).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        request_id = %request.request_id,
        user_id = %request.user_id,
        report = %body.report_name,
        org = %request.org,
        period = %period,
        outcome = if outcome.is_ok() { "ok" } else { "error" },
        latency_ms,
        "Report request handled"
    );

    let artifact = outcome.map_err(HttpAppError::from)?;
    let file_name = delivered_file_name(
        &compose_file_name(&state, &body.report_name, request).await,
        artifact.kind,
    );

    if let Some(recipient) = body.mail_to.as_deref() {
        deliver(&state, &body, recipient, &file_name, &artifact).await?;
        if body.mail_only {
            return Ok((
                StatusCode::OK,
                Json(serde_json::json!({
                    "delivered": "mail",
                    "recipient": recipient,
                    "file_name": file_name,
                })),
            )
                .into_response());
        }
    }

    Ok(inline_response(&file_name, artifact))
}

/// The complete file name handed to both sinks: composed name plus the
/// artifact's extension. Mail recipients see this as the attachment name.
fn delivered_file_name(file_name: &str, kind: ArtifactKind) -> String {
    format!("{}.{}", file_name, kind.file_extension())
}

/// Mail the artifact. A failure is fatal only when mail is the sole sink;
/// otherwise the artifact is still returned inline and the failure is
/// logged.
async fn deliver(
    state: &AppState,
    body: &GenerateReportBody,
    recipient: &str,
    file_name: &str,
    artifact: &Artifact,
) -> Result<(), HttpAppError> {
    let settings = match state.mail.as_ref() {
        Some(settings) => settings,
        None if body.mail_only => {
            return Err(HttpAppError(AppError::Mailing(
                "Mail delivery requested but SMTP is not configured".to_string(),
            )));
        }
        None => {
            tracing::warn!(recipient = %recipient, "SMTP not configured; returning artifact inline");
            return Ok(());
        }
    };

    let subject = format!("Report {}", file_name);
    let mail_body = format!(
        "The report you requested for the period {} is attached.",
        render_display_period(body.request.start, body.request.end)
    );
    match deliver_by_mail(settings, recipient, &subject, &mail_body, file_name, artifact).await {
        Ok(()) => Ok(()),
        Err(err) if body.mail_only => Err(HttpAppError(err)),
        Err(err) => {
            tracing::warn!(error = %err, recipient = %recipient, "Mail delivery failed; returning artifact inline");
            Ok(())
        }
    }
}

/// `<period>_<display_name>_<org_name>(<generate_date>)`, without the
/// extension (see [`delivered_file_name`]). Falls back to the raw ids when
/// the catalog or the organization directory has no display name.
async fn compose_file_name(state: &AppState, report_name: &str, request: &ReportRequest) -> String {
    let display_name = state
        .catalog
        .display_name(report_name)
        .map(String::from)
        .unwrap_or_else(|| report_name.to_string());
    let org_name = match state.orgs.org_name(&request.org).await {
        Ok(Some(name)) => name,
        Ok(None) => request.org.clone(),
        Err(err) => {
            tracing::warn!(error = %err, org = %request.org, "Organization lookup failed");
            request.org.clone()
        }
    };
    format!(
        "{}_{}_{}({})",
        render_display_period(request.start, request.end),
        display_name,
        org_name,
        generate_date("%Y-%m-%d")
    )
}

fn inline_response(file_name: &str, artifact: Artifact) -> Response {
    let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
    let disposition = format!("inline; filename*=UTF-8''{}", encoded);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.kind.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
