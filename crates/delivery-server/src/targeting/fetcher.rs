//! Active campaign lookup.

use std::sync::Arc;

use delivery_core::{Campaign, CampaignFilter, DeliveryError, Result};
use delivery_store::CampaignStore;
use tracing::warn;

/// Loads the active campaigns among a set of ids.
#[derive(Clone)]
pub struct CampaignFetcher {
    campaigns: Arc<dyn CampaignStore>,
}

impl CampaignFetcher {
    pub fn new(campaigns: Arc<dyn CampaignStore>) -> Self {
        Self { campaigns }
    }

    pub fn store_name(&self) -> &str {
        self.campaigns.name()
    }

    pub fn store(&self) -> &dyn CampaignStore {
        self.campaigns.as_ref()
    }

    /// Returns the `ACTIVE` campaigns whose id is in `campaign_ids`, in store
    /// order. Malformed documents are logged and skipped.
    ///
    /// # Errors
    ///
    /// `DeliveryError::QueryFailed` when the query or the cursor fails.
    pub async fn fetch_active(&self, campaign_ids: &[String]) -> Result<Vec<Campaign>> {
        let filter = CampaignFilter::new(campaign_ids.to_vec());

        let batch = self.campaigns.find_campaigns(&filter).await.map_err(|e| {
            DeliveryError::query_failed_with_cause(
                self.campaigns.name(),
                "failed to query campaigns",
                e,
            )
        })?;

        Ok(batch
            .into_iter()
            .filter_map(|document| match document {
                Ok(campaign) => Some(campaign),
                Err(e) => {
                    warn!(
                        document_id = e.document_id.as_deref().unwrap_or("<unknown>"),
                        error = %e.reason,
                        "Skipping undecodable campaign"
                    );
                    None
                },
            })
            .collect())
    }
}
