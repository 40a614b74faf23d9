use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, StatusCode};
use edge_api::EdgeApiModule;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::ServerConfig;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the application router with the full middleware stack.
///
/// Requests flow outermost to innermost:
/// `SetRequestId` → `PropagateRequestId` → Trace → Timeout → `BodyLimit` → Router.
#[must_use]
pub fn build_router(module: &EdgeApiModule, cfg: &ServerConfig) -> Router {
    let mut router = module.register_rest(Router::new());

    // Layer registration order (reverse of execution): innermost -> outermost

    // 5) Body limit
    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    // 4) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        Duration::from_secs(cfg.request_timeout_secs),
    ));

    // 3) Trace
    router = apply_trace_layer(router);

    // 2) PropagateRequestId
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

    // 1) SetRequestId (registered last, runs first)
    router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::info!(parent: span, "request completed");
                },
            ),
    )
}

/// Serves `router` on `cfg.bind_addr` until `cancel` fires.
///
/// # Errors
/// Fails if the address is invalid, the socket cannot be bound, or the
/// server stops with an I/O error.
pub async fn serve(router: Router, cfg: &ServerConfig, cancel: CancellationToken) -> Result<()> {
    let addr = cfg.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
