use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{
    delivery::get_campaigns, health::health_check, invalidate::invalidate_campaign,
    metrics::metrics_handler,
};
use crate::metrics::http::http_metrics_middleware;
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Permissive CORS policy: any origin, the usual verbs, JSON and auth headers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Answers successful CORS preflights with 204 instead of `CorsLayer`'s 200.
pub async fn preflight_no_content(request: Request<Body>, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = next.run(request).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

pub const DELIVERY_PATH: &str = "/v1/delivery";
pub const INVALIDATE_PATH: &str = "/v1/cache/campaigns/{campaign_id}";

/// Public delivery endpoint plus the cache administration endpoint.
fn campaign_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(DELIVERY_PATH, get(get_campaigns))
        .route(INVALIDATE_PATH, delete(invalidate_campaign))
        .with_state(state)
}

/// `/metrics` carries the Prometheus handle as its own state.
fn metrics_routes(prometheus_handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle)
}

/// Creates the full router: routes, HTTP metrics, request id, logging, CORS.
///
/// The request id layer is outermost so every log line and response carries it.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(cors_layer());

    campaign_routes(state)
        .merge(metrics_routes(prometheus_handle))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware_stack)
}

/// Runs the server until a shutdown signal arrives.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Delivery service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
