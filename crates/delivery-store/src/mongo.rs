//! MongoDB document store.
//!
//! Rule predicates are translated into MongoDB filter documents so matching
//! happens server side; only matching documents cross the wire.

use async_trait::async_trait;
use delivery_core::{
    Campaign, CampaignFilter, CampaignStatus, DimensionPredicate, TargetingFilter, TargetingRule,
};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Cursor, Database};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::MongoConfig;
use crate::error::{DecodeError, StoreError};
use crate::traits::{CampaignStore, DocumentBatch, RuleStore};

/// MongoDB-backed rule and campaign store.
///
/// One instance serves both [`RuleStore`] and [`CampaignStore`]; share it
/// behind an `Arc` and hand out one trait object per seam.
pub struct MongoStore {
    database: Database,
    rules: Collection<Document>,
    campaigns: Collection<Document>,
}

impl MongoStore {
    /// Connects to MongoDB and verifies the connection with a `ping`.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        options.server_selection_timeout = Some(config.server_selection_timeout());
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }

        let client =
            Client::with_options(options).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        let store = Self::from_database(client.database(&config.database), config);

        store.ping().await?;

        info!(
            database = %config.database,
            rules = %config.rules_collection,
            campaigns = %config.campaigns_collection,
            "Connected to MongoDB"
        );

        Ok(store)
    }

    /// Creates a store over an existing database handle.
    pub fn from_database(database: Database, config: &MongoConfig) -> Self {
        Self {
            rules: database.collection(&config.rules_collection),
            campaigns: database.collection(&config.campaigns_collection),
            database,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

#[async_trait]
impl RuleStore for MongoStore {
    async fn find_rules(
        &self,
        filter: &TargetingFilter,
    ) -> Result<DocumentBatch<TargetingRule>, StoreError> {
        let query = targeting_filter_document(filter);
        debug!(filter = %query, "Querying targeting rules");

        let cursor = self
            .rules
            .find(query)
            .await
            .map_err(|e| query_error(self.rules.name(), e))?;

        collect(self.rules.name(), cursor).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await
    }

    fn name(&self) -> &str {
        "mongo"
    }
}

#[async_trait]
impl CampaignStore for MongoStore {
    async fn find_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<DocumentBatch<Campaign>, StoreError> {
        let query = campaign_filter_document(filter);
        debug!(filter = %query, "Querying campaigns");

        let cursor = self
            .campaigns
            .find(query)
            .await
            .map_err(|e| query_error(self.campaigns.name(), e))?;

        collect(self.campaigns.name(), cursor).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await
    }

    fn name(&self) -> &str {
        "mongo"
    }
}

/// Drains a cursor, decoding each document independently.
///
/// A cursor failure aborts the whole batch.
async fn collect<T: DeserializeOwned>(
    collection: &str,
    mut cursor: Cursor<Document>,
) -> Result<DocumentBatch<T>, StoreError> {
    let mut batch = Vec::new();

    while let Some(document) = cursor
        .try_next()
        .await
        .map_err(|e| query_error(collection, e))?
    {
        let document_id = document.get_str("campaign_id").ok().map(str::to_string);
        batch.push(
            bson::from_document::<T>(document)
                .map_err(|e| DecodeError::new(document_id, e.to_string())),
        );
    }

    Ok(batch)
}

fn query_error(collection: &str, error: mongodb::error::Error) -> StoreError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } => StoreError::unavailable(error.to_string()),
        _ => StoreError::query(collection, error.to_string()),
    }
}

/// Renders one dimension predicate as a filter on the `rules` array.
///
/// A list stored as `null` counts as empty, as when decoding a [`Rule`].
///
/// [`Rule`]: delivery_core::Rule
pub fn dimension_filter_document(predicate: &DimensionPredicate) -> Document {
    let dimension = predicate.dimension().as_str();
    let value = predicate.value();
    let blank = || vec![Bson::Null, Bson::Array(Vec::new())];

    doc! {
        "$or": [
            {
                "rules": {
                    "$not": {
                        "$elemMatch": {
                            "dimension": dimension,
                            "$or": [
                                { "include": { "$nin": blank() } },
                                { "exclude": { "$nin": blank() } },
                            ],
                        },
                    },
                },
            },
            {
                "rules": {
                    "$elemMatch": {
                        "dimension": dimension,
                        "include": { "$in": [value] },
                    },
                },
            },
            {
                "rules": {
                    "$elemMatch": {
                        "dimension": dimension,
                        "exclude": {
                            "$nin": [Bson::Null, Bson::Array(Vec::new()), Bson::from(value)],
                        },
                    },
                },
            },
        ]
    }
}

/// Renders a targeting filter as the `$and` of its dimension filters.
pub fn targeting_filter_document(filter: &TargetingFilter) -> Document {
    let clauses: Vec<Document> = filter
        .predicates()
        .iter()
        .map(dimension_filter_document)
        .collect();

    doc! { "$and": clauses }
}

/// Renders a campaign filter: identifier in the set and status `ACTIVE`.
pub fn campaign_filter_document(filter: &CampaignFilter) -> Document {
    doc! {
        "campaign_id": { "$in": filter.campaign_ids().to_vec() },
        "status": CampaignStatus::Active.as_str(),
    }
}
