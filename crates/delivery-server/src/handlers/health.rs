use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::state::AppState;

const UP: &str = "UP";
const DOWN: &str = "DOWN";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backends: Backends,
}

#[derive(Debug, Serialize)]
pub struct Backends {
    pub rules: BackendHealth,
    pub campaigns: BackendHealth,
    pub cache: BackendHealth,
}

#[derive(Debug, Serialize)]
pub struct BackendHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendHealth {
    fn from_check<E: std::fmt::Display>(name: &str, check: Result<(), E>) -> Self {
        match check {
            Ok(()) => Self {
                name: name.to_string(),
                status: UP.to_string(),
                error: None,
            },
            Err(e) => Self {
                name: name.to_string(),
                status: DOWN.to_string(),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == UP
    }
}

impl HealthResponse {
    pub fn new(backends: Backends) -> Self {
        let up = backends.rules.is_up() && backends.campaigns.is_up() && backends.cache.is_up();
        Self {
            status: if up { UP } else { DOWN }.to_string(),
            backends,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == UP
    }
}

/// GET /health
///
/// Consulta cada backend; responde 503 si alguno no esta disponible.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let campaigns = state.campaigns();
    let rules = campaigns.resolver();
    let fetcher = campaigns.fetcher();
    let cache = campaigns.cache_store();

    let (rules_check, campaigns_check, cache_check) = tokio::join!(
        rules.store().health_check(),
        fetcher.store().health_check(),
        cache.health_check(),
    );

    let response = HealthResponse::new(Backends {
        rules: BackendHealth::from_check(rules.store_name(), rules_check),
        campaigns: BackendHealth::from_check(fetcher.store_name(), campaigns_check),
        cache: BackendHealth::from_check(cache.name(), cache_check),
    });

    let status = if response.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}
