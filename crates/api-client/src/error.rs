//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Display text of [`ApiError::AuthExpired`]
pub const AUTH_EXPIRED: &str = "AUTH_EXPIRED";

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A successful response did not match the expected shape
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        /// Request path
        path: String,
        /// Underlying serde failure
        #[source]
        source: serde_json::Error,
    },

    /// A successful response carried no `data` member
    #[error("Response from {0} carried no data")]
    MissingData(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The session could not be renewed, or the retry after renewal failed
    #[error("AUTH_EXPIRED")]
    AuthExpired,

    /// The API answered with a non-success status
    ///
    /// `message` is the caller's default text, suffixed with the server's
    /// own message when the error body carried one.
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Composed human-readable message
        message: String,
        /// The server's own message, when the body carried one
        detail: Option<String>,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Compose the failure for a non-success response.
    ///
    /// Yields `"<default>: <server message>"` when the parsed body has a
    /// string `message`, otherwise exactly `default_error`.
    pub fn from_response(status: u16, body: &serde_json::Value, default_error: &str) -> Self {
        let detail = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        let message = match &detail {
            Some(server) => format!("{default_error}: {server}"),
            None => default_error.to_string(),
        };
        Self::Api {
            status,
            message,
            detail,
        }
    }

    /// Message the server put in the error body, without the default prefix
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the session expired
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Whether the API answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}
