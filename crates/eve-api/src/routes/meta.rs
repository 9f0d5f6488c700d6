//! # Service Metadata

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Version of the schema document format served by this API.
pub const SCHEMA_FORMAT_VERSION: &str = "0.1";

/// Service metadata.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    /// Schema document format version.
    pub version: String,
    pub generated_at: DateTime<Utc>,
    /// Framework version the catalog was exported from, if recorded.
    pub esphome_version: Option<String>,
}

/// Build the metadata router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/meta", get(meta))
}

/// GET /api/meta: Format and framework versions.
#[utoipa::path(
    get,
    path = "/api/meta",
    responses(
        (status = 200, description = "Service metadata", body = MetaResponse),
    ),
    tag = "meta"
)]
pub(crate) async fn meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(MetaResponse {
        version: SCHEMA_FORMAT_VERSION.to_string(),
        generated_at: Utc::now(),
        esphome_version: state.schemas.framework_version(),
    })
}
