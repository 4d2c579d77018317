//! Error types for the relay.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable missing or empty
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// Variable present but unparsable
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Errors that can occur when talking to the Linear API.
#[derive(Debug, Error)]
pub enum LinearError {
    /// HTTP request failed
    #[error("failed to execute request: {0}")]
    Http(#[from] reqwest::Error),

    /// API key cannot be used as a header value
    #[error("invalid Linear API key")]
    InvalidApiKey,

    /// Linear answered with a non-success status
    #[error("linear API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Linear reported query errors
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// Response carried neither data nor errors
    #[error("no data in GraphQL response")]
    MissingData,

    /// A page claimed more results without a cursor to fetch them
    #[error("page reported hasNextPage without an endCursor")]
    MissingCursor,

    /// Pagination did not terminate within the page cap
    #[error("pagination exceeded {0} pages")]
    PageLimit(usize),
}

/// Errors that can occur when delivering a message to Discord.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("failed to send to discord: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("failed to marshal discord payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Discord answered with a non-2xx status
    #[error("discord returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Request-level failures surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound body is not a webhook envelope
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// Envelope is fine but `data` does not match its type
    #[error("failed to parse {entity} data: {source}")]
    MalformedData {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A setting needed by this endpoint is absent
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// Linear API failure
    #[error("failed to fetch issues: {0}")]
    Linear(#[from] LinearError),

    /// Discord delivery failure
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl RelayError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedData { .. } | Self::Linear(_) | Self::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
