//! # OpenAPI Document Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "eve API",
        version = "0.1.0",
        description = "Component discovery, translated UI schemas, project storage, board catalog, and CLI validation for the eve configuration editor.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Meta
        crate::routes::meta::meta,
        // Components
        crate::routes::components::list_components,
        crate::routes::components::component_schema,
        crate::routes::components::core_schema,
        // Projects
        crate::routes::projects::list_projects,
        crate::routes::projects::get_project,
        crate::routes::projects::save_project,
        // Boards
        crate::routes::boards::list_boards,
        crate::routes::boards::board_details,
        // Validation
        crate::routes::validate::validate,
    ),
    components(schemas(
        crate::routes::meta::MetaResponse,
        crate::routes::components::ComponentItem,
        crate::routes::components::ComponentsResponse,
        crate::routes::components::DocsResponse,
        crate::routes::components::ComponentSchemaResponse,
        crate::routes::components::CoreSchemaResponse,
        crate::routes::projects::ProjectsResponse,
        crate::routes::projects::ProjectResponse,
        crate::routes::projects::SaveProjectRequest,
        crate::routes::projects::SaveProjectResponse,
        crate::routes::boards::BoardsResponse,
        crate::boards::BoardTarget,
        crate::boards::Board,
        crate::boards::BoardPin,
        crate::boards::BoardDetails,
        crate::routes::validate::ValidateRequest,
        crate::validate::ValidationReport,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "meta", description = "Service metadata"),
        (name = "components", description = "Component listing and UI schemas"),
        (name = "projects", description = "Project documents"),
        (name = "boards", description = "Development board catalog"),
        (name = "validate", description = "Validation through the framework CLI"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
