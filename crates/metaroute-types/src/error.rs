use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("invalid meta key {key:?}: {reason}")]
    InvalidMetaKey { key: String, reason: String },
}
