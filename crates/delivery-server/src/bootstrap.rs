//! Builds the delivery components from settings.

use std::sync::Arc;

use anyhow::Context;
use delivery_store::{
    CacheStore, CampaignStore, MemoryCacheStore, MemoryStore, MongoStore, RedisCacheStore,
    RuleStore, SeedData,
};
use tracing::info;

use crate::cache::CampaignCache;
use crate::settings::{CacheBackend, Settings, StoreBackend};
use crate::state::AppState;

/// Connects the configured backends and assembles the application state.
pub async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let (rules, campaigns) = document_stores(settings).await?;
    let cache = cache_store(settings).await?;

    info!(
        rules = rules.name(),
        campaigns = campaigns.name(),
        cache = cache.name(),
        ttl_seconds = settings.cache.ttl_seconds,
        "Backends ready"
    );

    let orchestrator =
        CampaignCache::new(rules, campaigns, cache).with_ttl(settings.cache.ttl());

    Ok(AppState::new(orchestrator))
}

async fn document_stores(
    settings: &Settings,
) -> anyhow::Result<(Arc<dyn RuleStore>, Arc<dyn CampaignStore>)> {
    match settings.store.backend {
        StoreBackend::Mongo => {
            let store = Arc::new(
                MongoStore::connect(&settings.mongo)
                    .await
                    .context("failed to connect to MongoDB")?,
            );
            let rules: Arc<dyn RuleStore> = store.clone();
            let campaigns: Arc<dyn CampaignStore> = store;
            Ok((rules, campaigns))
        },
        StoreBackend::Memory => {
            let store = match &settings.store.seed_file {
                Some(path) => {
                    let seed = SeedData::from_path(path)
                        .with_context(|| format!("failed to load seed file {}", path.display()))?;
                    info!(
                        path = %path.display(),
                        rules = seed.rules.len(),
                        campaigns = seed.campaigns.len(),
                        "Seed data loaded"
                    );
                    MemoryStore::from_seed(&seed)
                },
                None => MemoryStore::new(),
            };
            let store = Arc::new(store);
            let rules: Arc<dyn RuleStore> = store.clone();
            let campaigns: Arc<dyn CampaignStore> = store;
            Ok((rules, campaigns))
        },
    }
}

async fn cache_store(settings: &Settings) -> anyhow::Result<Arc<dyn CacheStore>> {
    let cache: Arc<dyn CacheStore> = match settings.cache.backend {
        CacheBackend::Redis => Arc::new(
            RedisCacheStore::connect(&settings.redis)
                .await
                .context("failed to connect to Redis")?,
        ),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(&settings.cache.memory_config())),
    };
    Ok(cache)
}
