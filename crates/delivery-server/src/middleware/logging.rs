//! Middleware de logging estructurado.
//!
//! Cada request corre dentro de un span `http_request`. Al terminar se emite
//! un evento con el status, la duración y el resultado de la entrega. Los
//! probes (`/health`, `/metrics`) se registran en debug.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use tower::{Layer, Service};
use tracing::{Instrument, Span, debug, info, info_span, warn};

use super::request_id::REQUEST_ID_HEADER;

const PROBE_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Layer that logs requests and responses.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

/// What a response meant for the caller, as logged in the `outcome` field.
fn outcome(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "delivered",
        StatusCode::NO_CONTENT => "no_content",
        s if s.is_client_error() => "rejected",
        s if s.is_server_error() => "failed",
        _ => "other",
    }
}

/// Request fields captured before the inner service consumes the request.
struct RequestLog {
    started: Instant,
    probe: bool,
    span: Span,
}

impl RequestLog {
    fn begin(request: &Request<Body>) -> Self {
        let path = request.uri().path();
        // RequestIdLayer runs first, so the header is always present here
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        Self {
            started: Instant::now(),
            probe: PROBE_PATHS.contains(&path),
            span: info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                path = %path,
                query = request.uri().query().unwrap_or(""),
            ),
        }
    }

    fn finish(&self, status: StatusCode) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        let code = status.as_u16();
        let outcome = outcome(status);

        if status.is_server_error() {
            warn!(status = code, outcome, elapsed_ms, "Request failed");
        } else if self.probe {
            debug!(status = code, outcome, elapsed_ms, "Probe answered");
        } else {
            info!(status = code, outcome, elapsed_ms, "Request completed");
        }
    }
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let log = RequestLog::begin(&request);
        let span = log.span.clone();
        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                let response = inner.call(request).await?;
                log.finish(response.status());
                Ok(response)
            }
            .instrument(span),
        )
    }
}
