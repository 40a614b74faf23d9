use utoipa::OpenApi;

use super::dto::{
    CalculationDto, HealthDto, SetStateRequest, StateTransitionDto, StateValueDto,
};
use super::handlers;
use super::problem::Problem;

/// OpenAPI document for the routes served by this module.
///
/// Only the canonical paths are listed; `/{operation}/{x}/{y}`, `/set` and
/// `/get` are aliases with identical behavior.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Edge Calc API",
        description = "Arithmetic over path operands and a single shared current value"
    ),
    paths(
        handlers::calculate,
        handlers::set_state,
        handlers::get_state,
        handlers::root,
        handlers::healthz
    ),
    components(schemas(
        CalculationDto,
        SetStateRequest,
        StateTransitionDto,
        StateValueDto,
        HealthDto,
        Problem
    )),
    tags(
        (name = "calculator", description = "Arithmetic endpoints"),
        (name = "state", description = "Current value endpoints"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
