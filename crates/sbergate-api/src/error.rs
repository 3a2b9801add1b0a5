//! Error types for gateway API operations.

use thiserror::Error;

/// Error type for [`GateClient`](crate::client::GateClient) operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// The gateway is not reachable (connection refused, DNS failure, abort).
    #[error("gateway not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP transport or response decoding failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The base URL is not a usable http(s) URL.
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result type for gateway API operations.
pub type Result<T> = std::result::Result<T, GateError>;
