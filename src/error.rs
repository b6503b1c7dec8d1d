use thiserror::Error;

/// Errors that can occur while loading, searching and recording activity
#[derive(Error, Debug)]
pub enum FinderError {
    /// Failed to reach a remote endpoint
    #[error("Failed to fetch: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// The operation did not finish within its time budget
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Failed to read a local file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be decoded
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// User input was rejected before any work was done
    #[error("{0}")]
    Validation(String),

    /// The online recipe API failed
    #[error("API temporarily unavailable: {0}")]
    Api(String),

    /// The document store rejected or failed an operation
    #[error("Store error: {0}")]
    Store(String),

    /// The authentication provider rejected an operation
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The operation needs a signed-in user
    #[error("Please login to continue")]
    NotSignedIn,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl FinderError {
    /// Build an `Http` error from a response status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        FinderError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}
