use thiserror::Error;

/// Errors raised by the data access client and its token providers
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client or provider configuration is missing or malformed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Token acquisition failed
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// The data access service answered with a non-success status
    #[error("Service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request or response body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors raised by third-party provider implementations
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
