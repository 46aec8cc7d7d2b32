//! Error taxonomy for the acquisition pipeline, the checkpoint table and the
//! persistence layer.
//!
//! Only [`AuthError`] is meant to reach the top level during a run. Every
//! other [`FetchError`] is contained at the granularity of one resource key by
//! the aggregator; rate limiting and token expiry never leave the fetcher.

use thiserror::Error;

/// Failures while obtaining an application bearer credential.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Application credentials are missing from the configuration.
    #[error("missing application credentials: {0}")]
    Config(String),

    /// The token endpoint did not answer with a usable token.
    #[error("token request failed: {0}")]
    Request(String),
}

/// Failures of one logical fetch after all internal recovery paths ran out.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Still unauthorized after one refresh-and-retry.
    #[error("unauthorized for {url} after token refresh")]
    Unauthorized { url: String },

    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response body from {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl FetchError {
    /// Auth failures abort a whole run; everything else only costs one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Auth(_))
    }
}

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GenreLookupError {
    #[error("cannot read genre lookup: {0}")]
    Io(#[from] std::io::Error),

    #[error("genre lookup is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode column value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Crate level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    GenreLookup(#[from] GenreLookupError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;
