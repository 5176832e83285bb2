//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Report Platform API",
        version = "0.1.0",
        description = "Dispatch service for the nursing report platform: report catalog discovery, request validation, report generation over end-exclusive date windows, and inline or mail delivery of the generated artifacts."
    ),
    paths(
        handlers::generate::generate_report,
        handlers::reports::list_reports,
        handlers::readme::get_readme,
        handlers::orgs::update_nickname,
        handlers::orgs::update_name,
    ),
    components(schemas(
        handlers::generate::GenerateReportBody,
        handlers::reports::ReportEntry,
        reportd_core::ReportRequest,
        reportd_core::Organization,
        reportd_core::UpdateOrgNicknameRequest,
        reportd_core::UpdateOrgNameRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "reports", description = "Report catalog and generation"),
        (name = "organizations", description = "Organization name maintenance")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
