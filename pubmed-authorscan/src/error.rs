use std::result;

use thiserror::Error;

/// Error types for search, fetch and email resolution
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// A response body could not be decoded
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    /// Build an `ApiError` from a non-success HTTP status
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        PubMedError::ApiError {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        }
    }
}
