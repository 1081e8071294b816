//! # Delivery Server
//!
//! HTTP service that answers "which campaigns should this app, in this
//! country, on this OS, show?".
//!
//! - `GET /v1/delivery?app=&country=&os=`: targeted campaigns (200) or 204
//! - `DELETE /v1/cache/campaigns/{campaign_id}`: purge the cached results a
//!   campaign contributed to
//! - `GET /health`, `GET /metrics`
//!
//! Results are served cache-aside through [`cache::CampaignCache`]; a reverse
//! index per campaign makes invalidation targeted.

pub mod bootstrap;
pub mod cache;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;
pub mod targeting;

pub use bootstrap::build_state;
pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router_with_state, run_server_with_state};
pub use settings::Settings;
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
