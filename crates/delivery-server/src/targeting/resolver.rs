//! Targeting rule resolution.

use std::collections::HashSet;
use std::sync::Arc;

use delivery_core::{DeliveryError, NormalizedDimensions, Result, TargetingFilter};
use delivery_store::RuleStore;
use tracing::{debug, warn};

/// Resolves a dimension tuple into the ids of the campaigns targeting it.
#[derive(Clone)]
pub struct TargetingResolver {
    rules: Arc<dyn RuleStore>,
}

impl TargetingResolver {
    pub fn new(rules: Arc<dyn RuleStore>) -> Self {
        Self { rules }
    }

    /// Name of the underlying rule store.
    pub fn store_name(&self) -> &str {
        self.rules.name()
    }

    pub fn store(&self) -> &dyn RuleStore {
        self.rules.as_ref()
    }

    /// Returns the ids of every campaign whose rules match all three
    /// dimensions, deduplicated, in store order.
    ///
    /// Malformed rule documents are logged and skipped. No match is an empty
    /// list, not an error.
    ///
    /// # Errors
    ///
    /// `DeliveryError::QueryFailed` when the rule store query fails.
    pub async fn resolve(&self, dimensions: &NormalizedDimensions) -> Result<Vec<String>> {
        let filter = TargetingFilter::for_dimensions(dimensions);

        let batch = self.rules.find_rules(&filter).await.map_err(|e| {
            DeliveryError::query_failed_with_cause(
                self.rules.name(),
                "failed to query targeting rules",
                e,
            )
        })?;

        let mut seen = HashSet::new();
        let mut campaign_ids = Vec::new();

        for document in batch {
            match document {
                Ok(rule) => {
                    if seen.insert(rule.campaign_id.clone()) {
                        campaign_ids.push(rule.campaign_id);
                    }
                },
                Err(e) => {
                    warn!(
                        document_id = e.document_id.as_deref().unwrap_or("<unknown>"),
                        error = %e.reason,
                        "Skipping undecodable targeting rule"
                    );
                },
            }
        }

        debug!(
            dimensions = %dimensions,
            matched = campaign_ids.len(),
            "Targeting rules resolved"
        );

        Ok(campaign_ids)
    }
}
