//! Shared fixtures: a seeded store and a fully wired app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use delivery_core::{Campaign, CampaignStatus, Rule, TargetingRule};
use delivery_server::cache::CampaignCache;
use delivery_server::metrics::setup::detached_handle;
use delivery_server::{AppState, create_router_with_state};
use delivery_store::MemoryStore;

use super::client::TestClient;
use super::doubles::{CountingStore, FaultyCache};

fn campaign(id: &str, cta: &str, status: CampaignStatus) -> Campaign {
    Campaign {
        campaign_id: id.to_string(),
        name: id.to_string(),
        image: format!("https://cdn.example.com/{}.png", id),
        cta: cta.to_string(),
        status,
    }
}

/// Rules and campaigns used across the HTTP tests.
///
/// - spotify: app `spotify`, country `us` or `in`
/// - duolingo: any app, not `us`, os `android` or `ios`
/// - whatsapp: app `com.whatsapp`, os `android`
/// - subwaysurfer: os `android`, but the campaign is `INACTIVE`
pub fn fixture_store() -> MemoryStore {
    let store = MemoryStore::new();

    store.upsert_rule(&TargetingRule::new(
        "spotify",
        vec![
            Rule::include("app", ["spotify"]),
            Rule::include("country", ["us", "in"]),
            Rule::unconstrained("os"),
        ],
    ));
    store.upsert_rule(&TargetingRule::new(
        "duolingo",
        vec![
            Rule::unconstrained("app"),
            Rule::exclude("country", ["us"]),
            Rule::include("os", ["android", "ios"]),
        ],
    ));
    store.upsert_rule(&TargetingRule::new(
        "whatsapp",
        vec![
            Rule::include("app", ["com.whatsapp"]),
            Rule::unconstrained("country"),
            Rule::include("os", ["android"]),
        ],
    ));
    store.upsert_rule(&TargetingRule::new(
        "subwaysurfer",
        vec![
            Rule::include("app", ["com.gametion.ludokinggame"]),
            Rule::include("os", ["android"]),
        ],
    ));

    store.upsert_campaign(&campaign("spotify", "Download", CampaignStatus::Active));
    store.upsert_campaign(&campaign("duolingo", "Install", CampaignStatus::Active));
    store.upsert_campaign(&campaign("whatsapp", "Install", CampaignStatus::Active));
    store.upsert_campaign(&campaign("subwaysurfer", "Play", CampaignStatus::Inactive));

    store
}

/// App wired with counting stores and a faulty cache over the fixtures.
pub struct TestApp {
    pub store: Arc<CountingStore>,
    pub cache: Arc<FaultyCache>,
    pub campaigns: CampaignCache,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(fixture_store())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(CountingStore::new(store));
        let cache = Arc::new(FaultyCache::new());
        let campaigns = CampaignCache::new(store.clone(), store.clone(), cache.clone());

        Self {
            store,
            cache,
            campaigns,
        }
    }

    /// Replaces the TTL of cached results and reverse indexes.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.campaigns = self.campaigns.with_ttl(ttl);
        self
    }

    pub fn router(&self) -> Router {
        create_router_with_state(AppState::new(self.campaigns.clone()), detached_handle())
    }

    pub fn client(&self) -> TestClient {
        TestClient::new(self.router())
    }
}
