use std::sync::Arc;

use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::http::Uri;
use axum::{Extension, Json};
use tracing::{error, info, warn};

use crate::api::rest::dto::{
    CalculationDto, HealthDto, SetStateRequest, StateTransitionDto, StateValueDto,
};
use crate::api::rest::error::{ApiError, json_rejection_to_problem, map_domain_error};
use crate::api::rest::problem::Problem;
use crate::domain::calculator;
use crate::domain::service::StateService;

/// Value of the `source` field on calculation responses, shared by every request.
#[derive(Debug, Clone, Default)]
pub struct SourceTag(pub Option<Arc<str>>);

impl SourceTag {
    #[must_use]
    pub fn new(tag: Option<&str>) -> Self {
        Self(tag.map(Arc::from))
    }
}

/// GET /api/{operation}/{x}/{y}
///
/// # Errors
/// Plain-text 404 for an unknown operation, 400 for a literal `0` divisor.
#[utoipa::path(
    get,
    path = "/api/{operation}/{x}/{y}",
    tag = "calculator",
    params(
        ("operation" = String, Path, description = "One of add, subtract, multiply, divide"),
        ("x" = String, Path, description = "Left operand, parsed as a leading integer"),
        ("y" = String, Path, description = "Right operand, parsed as a leading integer")
    ),
    responses(
        (status = 200, description = "Result of the operation", body = CalculationDto),
        (status = 400, description = "Literal zero divisor", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown operation", body = String, content_type = "text/plain")
    )
)]
#[allow(clippy::unused_async)]
pub async fn calculate(
    Extension(source): Extension<SourceTag>,
    Path((operation, x, y)): Path<(String, String, String)>,
    uri: Uri,
) -> Result<Json<CalculationDto>, ApiError> {
    match calculator::calculate(&operation, &x, &y) {
        Ok(calculation) => Ok(Json(CalculationDto::new(
            &calculation,
            source.0.as_deref(),
        ))),
        Err(e) => {
            info!(%operation, %y, reason = %e, "calculation rejected");
            Err(map_domain_error(e, uri.path()))
        }
    }
}

/// POST /state/set
///
/// # Errors
/// Problem responses for unreadable bodies (4xx) and store failures (502).
#[utoipa::path(
    post,
    path = "/state/set",
    tag = "state",
    request_body = SetStateRequest,
    responses(
        (status = 200, description = "Value replaced", body = StateTransitionDto),
        (status = 400, description = "Body is not valid JSON", body = Problem, content_type = "application/problem+json"),
        (status = 415, description = "Body is not declared as JSON", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Missing or non-string value", body = Problem, content_type = "application/problem+json"),
        (status = 502, description = "State store failure", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn set_state(
    Extension(svc): Extension<Arc<StateService>>,
    uri: Uri,
    payload: Result<Json<SetStateRequest>, JsonRejection>,
) -> Result<Json<StateTransitionDto>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected state write body");
        json_rejection_to_problem(&rejection, uri.path())
    })?;

    info!(backend = svc.backend(), "Writing state value");

    match svc.write(req.value).await {
        Ok(transition) => Ok(Json(transition.into())),
        Err(e) => {
            error!("Failed to write state value: {e}");
            Err(map_domain_error(e, uri.path()))
        }
    }
}

/// GET /state/get
///
/// # Errors
/// 502 problem when the store cannot be read.
#[utoipa::path(
    get,
    path = "/state/get",
    tag = "state",
    responses(
        (status = 200, description = "Current value, null if never written", body = StateValueDto),
        (status = 502, description = "State store failure", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_state(
    Extension(svc): Extension<Arc<StateService>>,
    uri: Uri,
) -> Result<Json<StateValueDto>, ApiError> {
    match svc.read().await {
        Ok(value) => Ok(Json(StateValueDto { value })),
        Err(e) => {
            error!("Failed to read state value: {e}");
            Err(map_domain_error(e, uri.path()))
        }
    }
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthDto))
)]
#[allow(clippy::unused_async)] // axum handlers are async
pub async fn root() -> Json<HealthDto> {
    Json(HealthDto { data: "ok" })
}

/// GET /healthz
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String, content_type = "text/plain"))
)]
#[allow(clippy::unused_async)]
pub async fn healthz() -> &'static str {
    "ok"
}

/// Answers every path no route matches.
#[allow(clippy::unused_async)]
pub async fn fallback(uri: Uri) -> Problem {
    Problem::not_found(uri.path())
}
