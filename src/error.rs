//! Error types for FortiOS CMDB operations.

use thiserror::Error;

/// Errors that can occur during FortiOS CMDB operations.
#[derive(Debug, Error)]
pub enum FortiError {
    /// Configuration is missing or incomplete.
    #[error("FortiOS configuration required: {0}")]
    ConfigMissing(String),

    /// Invalid CMDB endpoint path.
    #[error("Invalid CMDB path '{0}': expected format like 'firewall/address'")]
    InvalidPath(String),

    /// A primary key was required but not supplied.
    #[error("'{field}' is required for this operation")]
    MissingKey { field: String },

    /// A primary key that cannot be used as a path segment.
    #[error("Invalid primary key '{0}': '.' and '..' cannot address an entry")]
    InvalidKey(String),

    /// Request body could not be built.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Object not found on the device.
    #[error("{path} '{mkey}' not found")]
    NotFound { path: String, mkey: String },

    /// The API token was rejected or lacks permission.
    #[error("Unauthorized (HTTP {http_status}): check the API token and its admin profile")]
    Unauthorized { http_status: u16 },

    /// API request failed.
    #[error("FortiOS API error: {message}")]
    ApiError {
        message: String,
        http_status: Option<u16>,
        /// FortiOS internal error code (e.g. `-3` for "entry not found").
        error_code: Option<i64>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl FortiError {
    /// Returns true if the device reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::ApiError {
                http_status,
                error_code,
                ..
            } => *http_status == Some(404) || *error_code == Some(-3),
            _ => false,
        }
    }
}

/// Result type alias for FortiOS operations.
pub type Result<T> = core::result::Result<T, FortiError>;
