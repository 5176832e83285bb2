//! Report catalog listing.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportEntry {
    /// Catalog id, the value accepted by `POST /report/generate`.
    pub id: String,
    /// Human-readable report name.
    pub display_name: String,
}

/// List the reports available on this deployment.
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Available reports", body = [ReportEntry])
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportEntry>>, HttpAppError> {
    let entries = state
        .catalog
        .display_names()
        .map(|(id, display_name)| ReportEntry {
            id: id.to_string(),
            display_name: display_name.to_string(),
        })
        .collect();
    Ok(Json(entries))
}
