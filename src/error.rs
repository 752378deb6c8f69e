//! Error types
//!
//! Every failure the selection pipeline can surface. The binary wraps these
//! in `anyhow` at the top level; library callers can match on the variants.

use thiserror::Error;

/// Errors raised while resolving, fetching or shaping variable sets
#[derive(Error, Debug)]
pub enum Error {
    /// A name filter with more than one value contains a wildcard
    #[error(
        "Parameter {parameter} cannot mix wildcards with more than one value. \
         Pass either a single wildcard pattern or a list of exact names"
    )]
    ParameterCollectionHasRegularAndWildcardItem { parameter: String },

    /// A wildcard pattern that cannot be compiled (e.g. unterminated `[`)
    #[error("Invalid wildcard pattern: {pattern}")]
    InvalidWildcardPattern { pattern: String },

    /// The server no longer knows a referenced resource
    #[error("{kind} with id '{id}' was not found")]
    ResourceNotFound { kind: String, id: String },

    /// Authentication or permission failure
    #[error("Access denied by the Octopus server ({status}). Check your API key")]
    Unauthorized { status: u16 },

    /// Any other non-success response
    #[error("API request failed: {status}")]
    Api { status: u16 },

    /// A successful response whose body is not the expected shape
    #[error("Unexpected response from the Octopus server while listing {kind}")]
    UnexpectedResponse { kind: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be rendered as YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Missing or invalid connection settings
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn unexpected_response(kind: impl Into<String>) -> Self {
        Self::UnexpectedResponse { kind: kind.into() }
    }

    /// True when the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}
