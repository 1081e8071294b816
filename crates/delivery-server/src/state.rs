//! Application state.

use std::sync::Arc;

use crate::cache::CampaignCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache-aside delivery orchestrator.
    campaigns: Arc<CampaignCache>,
}

impl AppState {
    /// Creates a new AppState around the delivery orchestrator.
    pub fn new(campaigns: CampaignCache) -> Self {
        Self {
            campaigns: Arc::new(campaigns),
        }
    }

    /// Returns the delivery orchestrator.
    pub fn campaigns(&self) -> &CampaignCache {
        self.campaigns.as_ref()
    }
}
