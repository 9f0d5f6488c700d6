//! # Projects API
//!
//! Read and write named YAML documents in the projects directory.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use eve_core::ProjectName;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Project listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectsResponse {
    pub projects: Vec<String>,
}

/// One project document.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub name: String,
    pub yaml: String,
}

/// Body of a save request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveProjectRequest {
    #[serde(default)]
    pub yaml: String,
}

/// Save acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveProjectResponse {
    pub ok: bool,
}

/// Build the projects router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{name}", get(get_project).put(save_project))
}

/// GET /api/projects: List project names.
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Sorted project names", body = ProjectsResponse),
    ),
    tag = "projects"
)]
pub(crate) async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = state.projects.list().await?;
    Ok(Json(ProjectsResponse { projects }))
}

/// GET /api/projects/{name}: Read a project document.
#[utoipa::path(
    get,
    path = "/api/projects/{name}",
    params(("name" = String, Path, description = "Project name")),
    responses(
        (status = 200, description = "Project document", body = ProjectResponse),
        (status = 400, description = "Invalid project name", body = crate::error::ErrorBody),
        (status = 404, description = "Project not found", body = crate::error::ErrorBody),
    ),
    tag = "projects"
)]
pub(crate) async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let name = ProjectName::new(&name)?;
    let yaml = state.projects.read(&name).await?;
    Ok(Json(ProjectResponse {
        name: name.to_string(),
        yaml,
    }))
}

/// PUT /api/projects/{name}: Create or replace a project document.
#[utoipa::path(
    put,
    path = "/api/projects/{name}",
    params(("name" = String, Path, description = "Project name")),
    request_body = SaveProjectRequest,
    responses(
        (status = 200, description = "Saved", body = SaveProjectResponse),
        (status = 400, description = "Invalid project name or body", body = crate::error::ErrorBody),
    ),
    tag = "projects"
)]
pub(crate) async fn save_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<SaveProjectRequest>, JsonRejection>,
) -> Result<Json<SaveProjectResponse>, AppError> {
    let name = ProjectName::new(&name)?;
    let req = extract_json(body)?;
    state.projects.write(&name, &req.yaml).await?;
    Ok(Json(SaveProjectResponse { ok: true }))
}
