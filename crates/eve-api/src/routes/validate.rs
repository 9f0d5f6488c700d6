//! # Validation API
//!
//! Runs the framework CLI over a submitted document. A document the CLI
//! rejects is a 200 with `ok: false`; only failing to run the CLI is an
//! error response.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;
use crate::validate::ValidationReport;

/// Body of a validation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    #[serde(default)]
    pub yaml: String,
}

/// Build the validation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/validate", post(validate))
}

/// POST /api/validate: Validate a document with the framework CLI.
#[utoipa::path(
    post,
    path = "/api/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "CLI exit status and output", body = ValidationReport),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 502, description = "CLI timed out", body = crate::error::ErrorBody),
        (status = 503, description = "CLI not installed", body = crate::error::ErrorBody),
    ),
    tag = "validate"
)]
pub(crate) async fn validate(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, AppError> {
    let req = extract_json(body)?;
    let report = state.validator.validate(&req.yaml).await?;
    Ok(Json(report))
}
