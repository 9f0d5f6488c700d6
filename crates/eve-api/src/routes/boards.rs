//! # Board Catalog API

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::boards::{Board, BoardDetails, BoardTarget};
use crate::error::AppError;
use crate::state::AppState;

/// Boards for one target.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardsResponse {
    pub target: BoardTarget,
    pub boards: Vec<Board>,
}

/// Build the board catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/espboards/{target}", get(list_boards))
        .route("/api/espboards/{target}/{slug}", get(board_details))
}

/// GET /api/espboards/{target}: Boards for `esp32` or `esp8266`.
#[utoipa::path(
    get,
    path = "/api/espboards/{target}",
    params(("target" = String, Path, description = "`esp32` or `esp8266`")),
    responses(
        (status = 200, description = "Boards sorted by name", body = BoardsResponse),
        (status = 400, description = "Unsupported target", body = crate::error::ErrorBody),
        (status = 502, description = "Catalog site unavailable", body = crate::error::ErrorBody),
    ),
    tag = "boards"
)]
pub(crate) async fn list_boards(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> Result<Json<BoardsResponse>, AppError> {
    let target: BoardTarget = target.parse()?;
    let boards = state.boards.boards(target).await?;
    Ok(Json(BoardsResponse {
        target,
        boards: boards.as_ref().clone(),
    }))
}

/// GET /api/espboards/{target}/{slug}: Board images and pin table.
#[utoipa::path(
    get,
    path = "/api/espboards/{target}/{slug}",
    params(
        ("target" = String, Path, description = "`esp32` or `esp8266`"),
        ("slug" = String, Path, description = "Board slug from the catalog"),
    ),
    responses(
        (status = 200, description = "Board details", body = BoardDetails),
        (status = 400, description = "Unsupported target or blank slug", body = crate::error::ErrorBody),
        (status = 502, description = "Catalog site unavailable", body = crate::error::ErrorBody),
    ),
    tag = "boards"
)]
pub(crate) async fn board_details(
    State(state): State<AppState>,
    Path((target, slug)): Path<(String, String)>,
) -> Result<Json<BoardDetails>, AppError> {
    let target: BoardTarget = target.parse()?;
    let details = state.boards.details(target, &slug).await?;
    Ok(Json(details.as_ref().clone()))
}
