//! Error types for the store backends.

use std::path::PathBuf;

/// Errors raised by a document store as a whole.
///
/// A single malformed document is not a `StoreError`; it is reported as a
/// [`DecodeError`] inside the returned batch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The query itself failed (server error, broken cursor, ...).
    #[error("query on '{collection}' failed: {reason}")]
    Query { collection: String, reason: String },

    /// The store is not reachable.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Creates a new query error.
    pub fn query(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Query {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new store unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// A stored document that could not be decoded into its domain type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode document {}: {reason}", document_id.as_deref().unwrap_or("<unknown>"))]
pub struct DecodeError {
    /// `campaign_id` of the document, when it could be read.
    pub document_id: Option<String>,
    /// Decoder message.
    pub reason: String,
}

impl DecodeError {
    pub fn new(document_id: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            document_id,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a key-value cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheStoreError {
    /// Redis command or connection failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The key holds a value of another kind (string vs. set).
    #[error("wrong kind of value stored at '{key}'")]
    WrongType { key: String },

    /// The cache backend is not reachable.
    #[error("cache unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CacheStoreError {
    /// Creates a new cache unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn wrong_type(key: impl Into<String>) -> Self {
        Self::WrongType { key: key.into() }
    }
}

/// Errors loading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// An I/O error occurred.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not valid YAML for the seed schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
