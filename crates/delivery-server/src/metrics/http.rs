//! HTTP metrics middleware.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};

pub const HTTP_REQUESTS_TOTAL: &str = "delivery_http_requests_total";
pub const HTTP_ERRORS_TOTAL: &str = "delivery_http_errors_total";
pub const HTTP_REQUEST_DURATION: &str = "delivery_http_request_duration_seconds";

/// Path label for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Labels de una request: metodo y ruta matcheada.
///
/// Se usa la ruta del router (`/v1/cache/campaigns/{campaign_id}`) y no el
/// path real, asi una serie no se multiplica por cada campaign id.
struct RouteLabels {
    method: String,
    route: String,
}

impl RouteLabels {
    fn new(request: &Request<Body>, matched_path: Option<&MatchedPath>) -> Self {
        Self {
            method: request.method().as_str().to_string(),
            route: matched_path
                .map(|p| p.as_str())
                .unwrap_or(UNMATCHED_ROUTE)
                .to_string(),
        }
    }

    fn record(self, status: StatusCode, elapsed: Duration) {
        let status = status.as_u16();
        let failed = status >= 400;
        let status = status.to_string();

        counter!(
            HTTP_REQUESTS_TOTAL,
            "method" => self.method.clone(),
            "path" => self.route.clone(),
            "status" => status.clone()
        )
        .increment(1);

        if failed {
            counter!(
                HTTP_ERRORS_TOTAL,
                "method" => self.method.clone(),
                "path" => self.route.clone(),
                "status" => status
            )
            .increment(1);
        }

        histogram!(
            HTTP_REQUEST_DURATION,
            "method" => self.method,
            "path" => self.route
        )
        .record(elapsed.as_secs_f64());
    }
}

/// Middleware que registra metricas HTTP para cada request.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let labels = RouteLabels::new(&request, matched_path.as_ref());
    let started = Instant::now();

    let response = next.run(request).await;

    labels.record(response.status(), started.elapsed());
    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_counter!(
        HTTP_ERRORS_TOTAL,
        "Total number of HTTP requests answered with a 4xx or 5xx status"
    );
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request duration"
    );
}
