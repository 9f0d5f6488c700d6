//! # eve-api — Axum API Service for the eve Editor
//!
//! Serves the browser-based configuration editor: which components exist,
//! what their configuration looks like as a renderable UI schema, where
//! the user's documents live, which development boards and pins are
//! available, and whether a finished document passes the framework's own
//! validation.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                  | Domain               |
//! |-------------------------|-------------------------|----------------------|
//! | `/api/meta`             | [`routes::meta`]        | Versions             |
//! | `/api/components`, `/api/schema/*`, `/api/core-schema/*` | [`routes::components`] | UI schemas |
//! | `/api/projects/*`       | [`routes::projects`]    | Project documents    |
//! | `/api/espboards/*`      | [`routes::boards`]      | Board catalog        |
//! | `/api/validate`         | [`routes::validate`]    | CLI validation       |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → Handler (→ static files fallback)
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI 3.1 document via utoipa derive macros at `/openapi.json`.

pub mod boards;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod projects;
pub mod routes;
pub mod state;
pub mod validate;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// When `STATIC_DIR` names an existing directory, unmatched paths are
/// served from it (`index.html` for directories).
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.cors_origins);
    let static_dir = state
        .settings
        .static_dir
        .clone()
        .filter(|dir| dir.is_dir());

    let mut api = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .merge(routes::meta::router())
        .merge(routes::components::router())
        .merge(routes::projects::router())
        .merge(routes::boards::router())
        .merge(routes::validate::router())
        .merge(openapi::router());

    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
        api = api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    api.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any method and header from the configured origins, without credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}
