//! Targeting resolution and campaign lookup.
//!
//! - `TargetingResolver`: dimension tuple -> ids of campaigns whose rules match
//! - `CampaignFetcher`: campaign ids -> active campaign records

pub mod fetcher;
pub mod resolver;

pub use fetcher::CampaignFetcher;
pub use resolver::TargetingResolver;
