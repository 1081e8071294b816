//! Cache invalidation through the per-campaign reverse index.

use delivery_core::{DeliveryError, InvalidationStage, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::CampaignCache;
use crate::cache::keys::index_key;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationResult {
    /// Campaña invalidada.
    pub campaign_id: String,
    /// Número de cache keys eliminadas.
    pub count: usize,
}

impl CampaignCache {
    /// Elimina todas las cache keys pobladas con la campaña y luego el
    /// reverse index mismo.
    ///
    /// Un fallo al borrar una key individual se loguea y no detiene el
    /// proceso; esa key expira por TTL.
    ///
    /// # Errors
    ///
    /// `DeliveryError::InvalidationFailed` si no se puede leer o borrar el
    /// reverse index.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use delivery_server::cache::CampaignCache;
    /// # use delivery_store::{MemoryCacheStore, MemoryStore};
    /// # #[tokio::main]
    /// # async fn main() -> delivery_core::Result<()> {
    /// # let store = Arc::new(MemoryStore::new());
    /// # let cache = CampaignCache::new(store.clone(), store, Arc::new(MemoryCacheStore::default()));
    /// let result = cache.invalidate("spotify").await?;
    /// println!("Invalidated {} entries", result.count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn invalidate(&self, campaign_id: &str) -> Result<InvalidationResult> {
        let index = index_key(campaign_id);

        let keys = self.cache_store().members(&index).await.map_err(|e| {
            DeliveryError::invalidation_failed(
                campaign_id,
                InvalidationStage::ReadIndex,
                e.to_string(),
            )
        })?;

        if keys.is_empty() {
            info!(campaign_id = %campaign_id, "No cache entries to invalidate");
            self.metrics().record_invalidation(0);
            return Ok(InvalidationResult {
                campaign_id: campaign_id.to_string(),
                count: 0,
            });
        }

        let mut count = 0;
        for key in &keys {
            match self.cache_store().delete(key).await {
                Ok(()) => count += 1,
                Err(e) => warn!(
                    campaign_id = %campaign_id,
                    key = %key,
                    error = %e,
                    "Failed to delete cache entry"
                ),
            }
        }

        self.cache_store().delete(&index).await.map_err(|e| {
            DeliveryError::invalidation_failed(
                campaign_id,
                InvalidationStage::DeleteIndex,
                e.to_string(),
            )
        })?;

        self.metrics().record_invalidation(count);
        info!(
            campaign_id = %campaign_id,
            count = count,
            indexed = keys.len(),
            "Cache entries invalidated"
        );

        Ok(InvalidationResult {
            campaign_id: campaign_id.to_string(),
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use delivery_store::{CacheStore, MemoryCacheStore, MemoryStore};

    fn cache_with(store: Arc<MemoryCacheStore>) -> CampaignCache {
        let documents = Arc::new(MemoryStore::new());
        CampaignCache::new(documents.clone(), documents, store)
    }

    #[tokio::test]
    async fn test_invalidate_removes_indexed_keys_and_index() {
        let store = Arc::new(MemoryCacheStore::default());
        let ttl = Duration::from_secs(60);
        for key in ["campaign:a:ios:us", "campaign:b:ios:us"] {
            store.set(key, "[]", ttl).await.unwrap();
            store
                .add_member("campaign:spotify:keys", key, ttl)
                .await
                .unwrap();
        }
        store.set("campaign:c:ios:us", "[]", ttl).await.unwrap();

        let result = cache_with(store.clone()).invalidate("spotify").await.unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(store.get("campaign:a:ios:us").await.unwrap(), None);
        assert_eq!(store.get("campaign:b:ios:us").await.unwrap(), None);
        assert!(store.get("campaign:c:ios:us").await.unwrap().is_some());
        assert!(store.members("campaign:spotify:keys").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_index_is_success() {
        let store = Arc::new(MemoryCacheStore::default());

        let result = cache_with(store).invalidate("unknown").await.unwrap();

        assert_eq!(
            result,
            InvalidationResult {
                campaign_id: "unknown".to_string(),
                count: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_unreadable_index_is_an_invalidation_error() {
        let store = Arc::new(MemoryCacheStore::default());
        store
            .set("campaign:spotify:keys", "not a set", Duration::from_secs(60))
            .await
            .unwrap();

        let err = cache_with(store).invalidate("spotify").await.unwrap_err();

        assert!(matches!(
            err,
            DeliveryError::InvalidationFailed {
                stage: InvalidationStage::ReadIndex,
                ..
            }
        ));
    }
}
