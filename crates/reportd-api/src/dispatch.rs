//! Report dispatch.
//!
//! Maps a validated request to the registered generator and invokes it with
//! the half-open date window `[start, end + 1 day)`. Generator failures are
//! classified at this boundary; nothing below it shapes HTTP responses.

use reportd_catalog::GenerateError;
use reportd_core::reporting::end_exclusive;
use reportd_core::{AppError, Artifact, ReportRequest};

use crate::state::AppState;

/// Resolve and invoke the generator for `report_name`.
///
/// The caller is responsible for request validation; this function only
/// checks catalog membership, registry resolution, and the invocation
/// itself.
pub async fn dispatch(
    state: &AppState,
    report_name: &str,
    request: &ReportRequest,
) -> Result<Artifact, AppError> {
    if !state.catalog.contains(report_name) {
        return Err(AppError::UnknownReport(report_name.to_string()));
    }
    let generator = state.registry.resolve(report_name).ok_or_else(|| {
        // The catalog lists this report but nothing registered a generator
        // for it: the reports directory and the registration table drifted.
        tracing::error!(report = %report_name, "Catalog/registry drift: no generator registered");
        AppError::ReportDrift(report_name.to_string())
    })?;

    let end = end_exclusive(request.end)?;
    let invocation = generator.generate(
        &request.org,
        request.start,
        end,
        request.suffix.as_deref(),
    );
    match tokio::time::timeout(state.request_timeout, invocation).await {
        Err(_) => Err(AppError::GenerationTimeout(
            state.request_timeout.as_secs(),
        )),
        Ok(Ok(artifact)) => Ok(artifact),
        Ok(Err(err)) => Err(classify(report_name, err)),
    }
}

/// Map generator error kinds onto the platform error taxonomy.
fn classify(report_name: &str, err: GenerateError) -> AppError {
    match err {
        GenerateError::Empty(msg) => AppError::EmptyReport(msg),
        GenerateError::Frequency(msg) => AppError::ReportFrequency(msg),
        GenerateError::Failed(source) => AppError::Generation {
            report: report_name.to_string(),
            source,
        },
    }
}
