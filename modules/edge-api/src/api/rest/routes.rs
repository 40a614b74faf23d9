use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use super::handlers::{self, SourceTag};
use super::openapi::ApiDoc;
use crate::domain::service::StateService;

/// Mounts every edge API route on `router`.
///
/// Each endpoint answers under two spellings: the `/api` and `/state`
/// prefixed form and the bare form.
#[must_use]
pub fn register_routes(router: Router, service: Arc<StateService>, source: SourceTag) -> Router {
    router
        .route("/api/{operation}/{x}/{y}", get(handlers::calculate))
        .route("/{operation}/{x}/{y}", get(handlers::calculate))
        .route("/state/set", post(handlers::set_state))
        .route("/set", post(handlers::set_state))
        .route("/state/get", get(handlers::get_state))
        .route("/get", get(handlers::get_state))
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/openapi.json", get(openapi_json))
        .fallback(handlers::fallback)
        .layer(Extension(service))
        .layer(Extension(source))
}

#[allow(clippy::unused_async)]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
