use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when interacting with the Computer Vision API.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request payload or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The API returned an error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// A request builder was given invalid or incomplete input.
    #[error("Invalid request: {0}")]
    Builder(String),

    /// A local image could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An asynchronous operation finished in a non-success terminal status.
    #[error("Operation {operation_id} finished with status {status}")]
    OperationFailed {
        operation_id: String,
        status: String,
    },

    /// An asynchronous operation did not finish within the allowed attempts.
    #[error("Operation {operation_id} still running after {attempts} poll attempts")]
    PollTimeout { operation_id: String, attempts: u32 },

    /// The caller cancelled an asynchronous operation.
    ///
    /// `operation_id` is `None` when cancellation happened before the
    /// service accepted the submission.
    #[error("{} was cancelled", cancelled_subject(.operation_id.as_deref()))]
    Cancelled { operation_id: Option<String> },
}

fn cancelled_subject(operation_id: Option<&str>) -> String {
    match operation_id {
        Some(id) => format!("Operation {id}"),
        None => "Submission".to_string(),
    }
}

impl VisionError {
    /// Create an [`VisionError::Http`] error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create an [`VisionError::InvalidEndpoint`] error without an underlying parse error.
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: None,
        }
    }

    /// Create an [`VisionError::InvalidEndpoint`] error wrapping a URL parse error.
    pub fn invalid_endpoint_with_source(message: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns `true` if this error means a required setting was not provided.
    pub fn is_missing_config(&self) -> bool {
        matches!(self, Self::MissingConfig(_))
    }
}

/// Result type alias for Computer Vision operations.
pub type VisionResult<T> = std::result::Result<T, VisionError>;
