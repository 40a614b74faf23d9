use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::problem::Problem;
use crate::domain::error::DomainError;

/// Error returned by the edge API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A request the validator refused, answered with the bare message as `text/plain`.
    Rejected { status: StatusCode, message: String },
    /// Everything else, answered as `application/problem+json`.
    Problem(Problem),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Rejected { status, message } => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                message,
            )
                .into_response(),
            Self::Problem(problem) => problem.into_response(),
        }
    }
}

impl From<Problem> for ApiError {
    fn from(problem: Problem) -> Self {
        Self::Problem(problem)
    }
}

/// Maps a domain error to the response shape the route answers with.
///
/// Validation failures keep their exact message as plain text; store
/// failures become a 502 problem.
#[must_use]
pub fn map_domain_error(e: DomainError, instance: &str) -> ApiError {
    let status = match &e {
        DomainError::InvalidOperation { .. } => StatusCode::NOT_FOUND,
        DomainError::DivisionByZero => StatusCode::BAD_REQUEST,
        DomainError::Store(_) => return ApiError::Problem(store_unavailable(instance)),
    };
    ApiError::Rejected {
        status,
        message: e.to_string(),
    }
}

/// 502 problem for a failed store call. The store's own message stays in the
/// handler's log line and is not echoed to the client.
#[must_use]
pub fn store_unavailable(instance: &str) -> Problem {
    let mut problem = Problem::new(
        StatusCode::BAD_GATEWAY,
        "Bad Gateway",
        "The state store could not be reached or rejected the request",
    )
    .with_code("STATE_STORE_UNAVAILABLE")
    .with_instance(instance);

    if let Some(id) = tracing::Span::current().id() {
        problem = problem.with_trace_id(id.into_u64().to_string());
    }
    problem
}

/// Problem for a JSON body axum refused to extract. The status comes from the rejection.
#[must_use]
pub fn json_rejection_to_problem(rejection: &JsonRejection, instance: &str) -> Problem {
    let status = rejection.status();
    let title = status.canonical_reason().unwrap_or("Bad Request");
    Problem::new(status, title, rejection.body_text())
        .with_code("INVALID_REQUEST_BODY")
        .with_instance(instance)
}
