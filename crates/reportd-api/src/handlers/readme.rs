//! Platform readme with the live report listing appended.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::state::AppState;

const README_BODY: &str = include_str!("../../README.md");

/// Markdown readme: static body plus the current report catalog.
#[utoipa::path(
    get,
    path = "/readme",
    responses(
        (status = 200, description = "Platform readme", content_type = "text/markdown")
    ),
    tag = "reports"
)]
pub async fn get_readme(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        compose_readme(README_BODY, &state),
    )
}

fn compose_readme(body: &str, state: &AppState) -> String {
    let mut document = String::from(body);
    document.push_str("\n## Current available reports\n");
    let listing = state
        .catalog
        .display_names()
        .map(|(id, display_name)| format!("* {} ({})", display_name, id))
        .collect::<Vec<_>>()
        .join("\n");
    document.push_str(&listing);
    document
}
