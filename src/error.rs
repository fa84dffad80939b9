//! Error types for the monitoring API client
//!
//! Every failure surfaces to the immediate caller; nothing in this crate
//! retries or swallows an error. The one local recovery path is the bounded
//! delete-children flow in [`crate::resources::entity`], which interprets a
//! `childrenExistError` validation error as actionable.

use serde_json::Value;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the monitoring API client
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying HTTP request could not be performed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request payload could not be encoded as JSON
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A non-empty response arrived without a content-type header
    #[error("missing content-type header")]
    MissingContentType,

    /// The response declared a JSON content type but the body failed to parse
    #[error("failed to parse JSON response: {reason}")]
    MalformedResponse { reason: String },

    /// The service rejected the request with a semantic validation failure
    #[error("validation error: {message} (type={kind}, code={code})")]
    Validation {
        code: i64,
        kind: String,
        message: String,
        details: Value,
    },

    /// Create/update reported success but omitted the required location header
    #[error("missing location header")]
    MissingLocation,

    /// A location path used a collection name absent from the lookup table.
    /// Contract violation between client and service, not a runtime condition.
    #[error("unknown collection in location path: {0}")]
    UnknownCollection(String),

    /// Catch-all for any status code not explicitly modeled
    #[error("unexpected status code: {status} (url={url}, details={details})")]
    UnexpectedStatus {
        status: u16,
        url: String,
        details: String,
    },

    /// A decoded record was missing a required field
    #[error("missing field `{field}` in {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// Reading or writing the config file failed
    #[error("config file error at {path}: {reason}")]
    Io { path: String, reason: String },
}

impl Error {
    /// Whether this is a `childrenExistError` validation failure, the one
    /// variant the entity-delete recovery path treats as actionable.
    pub fn is_children_exist(&self) -> bool {
        matches!(self, Error::Validation { kind, .. } if kind == "childrenExistError")
    }
}
