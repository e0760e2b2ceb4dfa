//! Error types for slide fetch operations.

use thiserror::Error;

/// Error type for a single fetch.
///
/// Every variant names the address that was requested.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The address could not be turned into a URL.
    #[error("Invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("Network error fetching `{address}`: {source}")]
    Network {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status} fetching `{address}`")]
    Status {
        address: String,
        status: reqwest::StatusCode,
    },

    /// Response body exceeds the configured maximum.
    #[error("Response from `{address}` too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { address: String, size: u64, max: u64 },

    /// The address is unknown to the source (used by non-HTTP sources).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Creates an invalid address error.
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == reqwest::StatusCode::NOT_FOUND,
            Self::NotFound(_) => true,
            _ => false,
        }
    }
}
