//! # Components & Schemas API
//!
//! Lists the (domain, platform) pairs the editor may offer and serves the
//! translated UI schema for each, plus schemas for core modules such as
//! `esphome` and `wifi`.
//!
//! When an allowlist is configured, listing is limited to it (unless the
//! caller passes `all=1`) and schemas outside it answer 404.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use eve_core::{ComponentName, ComponentRef};
use eve_schema::{ComponentSchemaDocument, CoreSchemaDocument, UiSchema};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::state::AppState;

/// Query for the component listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComponentsQuery {
    /// `1` lists every component, ignoring the allowlist.
    pub all: Option<String>,
}

/// One listed component.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentItem {
    pub domain: String,
    pub platform: String,
}

/// Component listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsResponse {
    /// `1` when the listing was limited to the allowlist.
    pub allowlist_mode: u8,
    pub components: Vec<ComponentItem>,
}

/// Module documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocsResponse {
    pub description: Option<String>,
}

/// Translated schema of a platform component.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchemaResponse {
    pub domain: String,
    pub platform: String,
    /// `<domain>.<platform>`.
    pub display_name: String,
    pub docs: DocsResponse,
    /// UI schema tree.
    #[schema(value_type = Object)]
    pub schema: UiSchema,
}

impl From<&ComponentSchemaDocument> for ComponentSchemaResponse {
    fn from(doc: &ComponentSchemaDocument) -> Self {
        Self {
            domain: doc.domain.clone(),
            platform: doc.platform.clone(),
            display_name: doc.display_name.clone(),
            docs: DocsResponse {
                description: doc.docs.description.clone(),
            },
            schema: doc.schema.clone(),
        }
    }
}

/// Translated schema of a core module.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoreSchemaResponse {
    pub name: String,
    pub display_name: String,
    pub docs: DocsResponse,
    /// UI schema tree.
    #[schema(value_type = Object)]
    pub schema: UiSchema,
}

impl From<&CoreSchemaDocument> for CoreSchemaResponse {
    fn from(doc: &CoreSchemaDocument) -> Self {
        Self {
            name: doc.name.clone(),
            display_name: doc.display_name.clone(),
            docs: DocsResponse {
                description: doc.docs.description.clone(),
            },
            schema: doc.schema.clone(),
        }
    }
}

/// Build the components router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/components", get(list_components))
        .route("/api/schema/{domain}/{platform}", get(component_schema))
        .route("/api/core-schema/{name}", get(core_schema))
}

/// GET /api/components: List components, limited to the allowlist.
#[utoipa::path(
    get,
    path = "/api/components",
    params(ComponentsQuery),
    responses(
        (status = 200, description = "Available components", body = ComponentsResponse),
    ),
    tag = "components"
)]
pub(crate) async fn list_components(
    State(state): State<AppState>,
    Query(query): Query<ComponentsQuery>,
) -> Json<ComponentsResponse> {
    let filter = match query.all.as_deref() {
        Some("1") => None,
        _ => state.allowlist(),
    };
    let components = state
        .schemas
        .list_components(filter)
        .into_iter()
        .map(|c| ComponentItem {
            domain: c.domain().to_string(),
            platform: c.platform().to_string(),
        })
        .collect();
    Json(ComponentsResponse {
        allowlist_mode: u8::from(filter.is_some()),
        components,
    })
}

/// GET /api/schema/{domain}/{platform}: Translated component schema.
#[utoipa::path(
    get,
    path = "/api/schema/{domain}/{platform}",
    params(
        ("domain" = String, Path, description = "Component domain, e.g. `sensor`"),
        ("platform" = String, Path, description = "Platform within the domain, e.g. `dht`"),
    ),
    responses(
        (status = 200, description = "Component schema", body = ComponentSchemaResponse),
        (status = 400, description = "Malformed name or schema failed to load", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown or not in the allowlist", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub(crate) async fn component_schema(
    State(state): State<AppState>,
    Path((domain, platform)): Path<(String, String)>,
) -> Result<Json<ComponentSchemaResponse>, AppError> {
    let component = ComponentRef::new(&domain, &platform)?;
    if !state.is_allowed(&component) {
        return Err(AppError::NotFound(format!(
            "component {} is not in the allowlist",
            component.display_name()
        )));
    }
    let doc = state.schemas.component_schema(&component)?;
    Ok(Json(ComponentSchemaResponse::from(doc.as_ref())))
}

/// GET /api/core-schema/{name}: Translated core module schema.
#[utoipa::path(
    get,
    path = "/api/core-schema/{name}",
    params(
        ("name" = String, Path, description = "Core module name, e.g. `esphome`"),
    ),
    responses(
        (status = 200, description = "Core module schema", body = CoreSchemaResponse),
        (status = 400, description = "Malformed name or schema failed to load", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown module", body = crate::error::ErrorBody),
    ),
    tag = "components"
)]
pub(crate) async fn core_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CoreSchemaResponse>, AppError> {
    let name = ComponentName::new(&name)?;
    let doc = state.schemas.core_schema(&name)?;
    Ok(Json(CoreSchemaResponse::from(doc.as_ref())))
}
