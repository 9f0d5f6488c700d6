//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry, identifier, board catalog, and validator failures to HTTP
//! status codes with a JSON body carrying a machine-readable code and a
//! message. Internal error details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eve_core::{RegistryError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::boards::BoardsError;
use crate::projects::ProjectError;
use crate::validate::ValidateError;

/// Structured JSON error response body.
///
/// All error responses use this format across the API surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_INPUT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found, or component outside the allowlist (404).
    /// Carries the complete client-facing message.
    #[error("{0}")]
    NotFound(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A caller-supplied identifier was malformed (400).
    #[error("{0}")]
    InvalidInput(String),

    /// The registry failed to load an existing validator (400).
    #[error("failed to load schema: {0}")]
    SchemaLoad(String),

    /// The board catalog site or the validator process failed (502).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The external validator command is not installed (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::SchemaLoad(_) => (StatusCode::BAD_REQUEST, "SCHEMA_LOAD_FAILED"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) | Self::ServiceUnavailable(_) => {
                tracing::warn!(error = %self, "dependency failure")
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed identifiers are client errors.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Unknown components are 404; anything else failed while loading.
impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => Self::NotFound(err.to_string()),
            RegistryError::Load(reason) => Self::SchemaLoad(reason),
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match &err {
            ProjectError::NotFound(_) => Self::NotFound(err.to_string()),
            ProjectError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<BoardsError> for AppError {
    fn from(err: BoardsError) -> Self {
        match &err {
            BoardsError::InvalidTarget(_) | BoardsError::MissingSlug => {
                Self::InvalidInput(err.to_string())
            }
            BoardsError::Fetch { .. } | BoardsError::Status { .. } => Self::Upstream(err.to_string()),
            BoardsError::Client(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ValidateError> for AppError {
    fn from(err: ValidateError) -> Self {
        match &err {
            ValidateError::CommandMissing(_) => Self::ServiceUnavailable(err.to_string()),
            ValidateError::Timeout(_) => Self::Upstream(err.to_string()),
            ValidateError::Io(_) => Self::Internal(err.to_string()),
        }
    }
}
