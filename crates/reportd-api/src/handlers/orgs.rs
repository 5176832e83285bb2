//! Organization name maintenance.
//!
//! These two write endpoints ride the same validation plane as report
//! generation: body validation failures come back as 422 with the
//! offending field list.

use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use reportd_core::{Organization, UpdateOrgNameRequest, UpdateOrgNicknameRequest};

use crate::error::HttpAppError;
use crate::state::AppState;

/// Update an organization's nickname.
#[utoipa::path(
    post,
    path = "/org/nickname",
    request_body = UpdateOrgNicknameRequest,
    responses(
        (status = 200, description = "Updated organization", body = Organization),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failure", body = crate::error::ErrorResponse)
    ),
    tag = "organizations"
)]
pub async fn update_nickname(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateOrgNicknameRequest>,
) -> Result<Json<Organization>, HttpAppError> {
    body.validate().map_err(HttpAppError::from)?;
    let updated = state.orgs.update_nickname(&body.org, &body.nickname).await?;
    tracing::info!(org = %body.org, "Organization nickname updated");
    Ok(Json(updated))
}

/// Update an organization's official name.
#[utoipa::path(
    post,
    path = "/org/name",
    request_body = UpdateOrgNameRequest,
    responses(
        (status = 200, description = "Updated organization", body = Organization),
        (status = 404, description = "Organization not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failure", body = crate::error::ErrorResponse)
    ),
    tag = "organizations"
)]
pub async fn update_name(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateOrgNameRequest>,
) -> Result<Json<Organization>, HttpAppError> {
    body.validate().map_err(HttpAppError::from)?;
    let updated = state.orgs.update_name(&body.org, &body.name).await?;
    tracing::info!(org = %body.org, "Organization name updated");
    Ok(Json(updated))
}
