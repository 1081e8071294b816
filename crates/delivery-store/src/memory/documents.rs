//! In-memory document store.

use async_trait::async_trait;
use delivery_core::{Campaign, CampaignFilter, TargetingFilter, TargetingRule};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, StoreError};
use crate::seed::SeedData;
use crate::traits::{CampaignStore, DocumentBatch, RuleStore};

/// Rule and campaign store held in process memory.
///
/// Documents are kept as raw JSON and decoded on every query, so a
/// malformed document shows up as a [`DecodeError`] in the returned batch
/// just like it would with a real document store. A document that cannot be
/// decoded cannot be evaluated against the filter and is always returned.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: RwLock<Vec<Value>>,
    campaigns: RwLock<Vec<Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the rules and campaigns of a seed file.
    pub fn from_seed(seed: &SeedData) -> Self {
        let store = Self::new();
        for rule in &seed.rules {
            store.upsert_rule(rule);
        }
        for campaign in &seed.campaigns {
            store.upsert_campaign(campaign);
        }
        store
    }

    /// Inserts or replaces the targeting document of a campaign.
    pub fn upsert_rule(&self, rule: &TargetingRule) {
        upsert(&self.rules, &rule.campaign_id, rule);
    }

    /// Inserts or replaces a campaign document.
    pub fn upsert_campaign(&self, campaign: &Campaign) {
        upsert(&self.campaigns, &campaign.campaign_id, campaign);
    }

    /// Appends a raw targeting document without validating it.
    pub fn insert_raw_rule(&self, document: Value) {
        self.rules.write().push(document);
    }

    /// Appends a raw campaign document without validating it.
    pub fn insert_raw_campaign(&self, document: Value) {
        self.campaigns.write().push(document);
    }

    /// Returns the number of stored targeting documents.
    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns the number of stored campaign documents.
    pub fn campaign_count(&self) -> usize {
        self.campaigns.read().len()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn find_rules(
        &self,
        filter: &TargetingFilter,
    ) -> Result<DocumentBatch<TargetingRule>, StoreError> {
        Ok(select(&self.rules, |rule: &TargetingRule| {
            filter.matches(rule)
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn find_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<DocumentBatch<Campaign>, StoreError> {
        Ok(select(&self.campaigns, |campaign: &Campaign| {
            filter.matches(campaign)
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn upsert<T: Serialize>(documents: &RwLock<Vec<Value>>, campaign_id: &str, document: &T) {
    let value = match serde_json::to_value(document) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(campaign_id = %campaign_id, error = %e, "Skipping unserializable document");
            return;
        },
    };

    let mut documents = documents.write();
    match documents
        .iter_mut()
        .find(|d| d.get("campaign_id").and_then(Value::as_str) == Some(campaign_id))
    {
        Some(existing) => *existing = value,
        None => documents.push(value),
    }
}

fn select<T, F>(documents: &RwLock<Vec<Value>>, predicate: F) -> DocumentBatch<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    documents
        .read()
        .iter()
        .filter_map(|document| {
            let document_id = document
                .get("campaign_id")
                .and_then(Value::as_str)
                .map(str::to_string);

            match serde_json::from_value::<T>(document.clone()) {
                Ok(decoded) if predicate(&decoded) => Some(Ok(decoded)),
                Ok(_) => None,
                Err(e) => Some(Err(DecodeError::new(document_id, e.to_string()))),
            }
        })
        .collect()
}
