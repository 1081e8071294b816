//! Error types for the delivery service.
//!
//! Only two kinds of failure cross a component boundary: a data-source
//! query failure while resolving or fetching campaigns, and a failure of the
//! reverse-index bookkeeping during cache invalidation. Everything the cache
//! layer does wrong is absorbed as a cache miss and never becomes an error.
//!
//! Mapping these variants to transport status codes is the job of the
//! inbound boundary, not of this crate.
//!
//! # Example
//!
//! ```
//! use delivery_core::{DeliveryError, Result};
//!
//! fn resolve(app: &str) -> Result<Vec<String>> {
//!     if app.is_empty() {
//!         return Err(DeliveryError::invalid_dimension("app", "Parameter app is required"));
//!     }
//!     Ok(vec![format!("campaign-for-{}", app)])
//! }
//!
//! assert!(resolve("spotify").is_ok());
//! assert!(resolve("").unwrap_err().is_invalid_dimension());
//! ```

use std::fmt;
use thiserror::Error;

/// Step of the invalidation procedure that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationStage {
    /// Reading the reverse-index set of a campaign.
    ReadIndex,
    /// Deleting the reverse-index set once its keys were purged.
    DeleteIndex,
}

impl fmt::Display for InvalidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadIndex => write!(f, "read reverse index"),
            Self::DeleteIndex => write!(f, "delete reverse index"),
        }
    }
}

/// Main error type for delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The rule store or the campaign store could not answer a query.
    #[error("Query against '{store}' failed: {message}")]
    QueryFailed {
        /// Name of the store that failed
        store: String,
        /// Description of what went wrong
        message: String,
        /// Underlying error
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The reverse index of a campaign could not be read or removed.
    #[error("Cache invalidation for campaign '{campaign_id}' failed to {stage}: {message}")]
    InvalidationFailed {
        /// Campaign whose cache entries were being purged
        campaign_id: String,
        /// Which step failed
        stage: InvalidationStage,
        /// Description of what went wrong
        message: String,
    },

    /// A request dimension is missing or blank.
    #[error("Invalid dimension '{dimension}': {reason}")]
    InvalidDimension {
        /// Dimension name (`app`, `country`, `os`)
        dimension: String,
        /// Why it's invalid
        reason: String,
    },
}

impl DeliveryError {
    /// Creates a QueryFailed error without a cause.
    pub fn query_failed(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryFailed {
            store: store.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a QueryFailed error with a cause.
    pub fn query_failed_with_cause<E>(
        store: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryFailed {
            store: store.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates an InvalidationFailed error.
    pub fn invalidation_failed(
        campaign_id: impl Into<String>,
        stage: InvalidationStage,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidationFailed {
            campaign_id: campaign_id.into(),
            stage,
            message: message.into(),
        }
    }

    /// Creates an InvalidDimension error.
    pub fn invalid_dimension(dimension: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            dimension: dimension.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if a data source could not be queried.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, Self::QueryFailed { .. })
    }

    /// Returns true if cache invalidation failed.
    pub fn is_invalidation_failure(&self) -> bool {
        matches!(self, Self::InvalidationFailed { .. })
    }

    /// Returns true if the request dimensions were rejected.
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(self, Self::InvalidDimension { .. })
    }
}

/// Type alias for Results with DeliveryError.
pub type Result<T> = std::result::Result<T, DeliveryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_query_failed_display() {
        let error = DeliveryError::query_failed("mongo:rules", "connection refused");
        let msg = error.to_string();

        assert!(msg.contains("mongo:rules"));
        assert!(msg.contains("connection refused"));
        assert!(error.is_query_failure());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_query_failed_keeps_cause() {
        let io_error = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let error = DeliveryError::query_failed_with_cause("mongo:campaigns", "find", io_error);

        assert!(error.source().is_some());
    }

    #[test]
    fn test_invalidation_failed_display() {
        let error = DeliveryError::invalidation_failed(
            "spotify",
            InvalidationStage::ReadIndex,
            "redis: connection closed",
        );

        assert_eq!(
            error.to_string(),
            "Cache invalidation for campaign 'spotify' failed to read reverse index: redis: connection closed"
        );
        assert!(error.is_invalidation_failure());
        assert!(!error.is_query_failure());
    }

    #[test]
    fn test_invalid_dimension() {
        let error = DeliveryError::invalid_dimension("os", "Parameter os is required");

        assert!(error.is_invalid_dimension());
        assert!(error.to_string().contains("Parameter os is required"));
    }
}
