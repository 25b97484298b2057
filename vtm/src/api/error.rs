use thiserror::Error;
use tfplug::TfplugError;

/// Error id the appliance uses for missing objects
pub const NOT_FOUND_ERROR_ID: &str = "resource.not_found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid object name: '{0}'")]
    InvalidName(String),

    #[error("{message}")]
    NotFound { message: String },

    #[error("API returned error (HTTP {status}, {error_id}): {message}")]
    Api {
        status: u16,
        error_id: String,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authentication failed")]
    Auth,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    Framework(TfplugError),
}

impl ApiError {
    /// The remote object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<TfplugError> for ApiError {
    fn from(err: TfplugError) -> Self {
        match err {
            TfplugError::Cancelled => ApiError::Cancelled,
            TfplugError::DeadlineExceeded => ApiError::DeadlineExceeded,
            other => ApiError::Framework(other),
        }
    }
}
