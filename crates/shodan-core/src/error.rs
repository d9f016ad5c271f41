use thiserror::Error;

/// Result type alias for Shodan operations
pub type Result<T> = std::result::Result<T, ShodanError>;

/// Errors that can occur when using the Shodan API
///
/// Every variant is terminal for the call that produced it. The client never
/// retries on its own; callers decide whether a failure is worth repeating.
#[derive(Error, Debug)]
pub enum ShodanError {
    /// Base URL plus path did not form a valid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request parameters could not be flattened into query pairs
    #[error("cannot encode query parameters: {0}")]
    QueryEncode(String),

    /// Network, TLS or timeout failure before a response was obtained,
    /// or a read failure on an open stream
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// API answered with a non-200 status
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API (or the trimmed response body)
        message: String,
    },

    /// The body of an error response could not be read
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// A 200 response did not match the expected shape, or the sink it was
    /// copied into failed
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Input rejected before any request was sent
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ShodanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ShodanError {
    /// Returns true if repeating the same call could succeed.
    ///
    /// Only transport failures qualify; an API refusal needs the caller to
    /// change something first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api { code: 401, .. })
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the upstream message if this is an API error
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
