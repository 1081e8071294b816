//! Delivery Core - Domain types and targeting predicates
//!
//! This crate provides the foundational types for the campaign delivery
//! service: the request dimensions, the targeting rule and campaign
//! documents, the rule predicate builder and the error hierarchy.

pub mod error;
pub mod model;
pub mod predicate;
pub mod types;

pub use error::{DeliveryError, InvalidationStage, Result};
pub use model::{Campaign, CampaignStatus, CampaignSummary, Rule, TargetingRule};
pub use predicate::{CampaignFilter, DimensionPredicate, TargetingFilter, build_predicate};
pub use types::{Dimension, Dimensions, NormalizedDimensions};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
