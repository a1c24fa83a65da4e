//! Submission error types and classification

use std::time::Duration;
use thiserror::Error;

/// Result type for submission operations
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Broad category of a failed submission.
///
/// The controller branches on this discriminator instead of inspecting
/// concrete error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The payload was rejected as malformed. Never retried.
    Validation,
    /// Network, timeout or server-side failure. Retried up to the cap.
    Transport,
    /// The backend answered but reported `success: false`.
    Application,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Application => write!(f, "application"),
        }
    }
}

/// Errors raised while sending a contact form to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Invalid form data: {message}")]
    Validation { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    /// `timeout` is `None` when the limit that expired is not known
    #[error("Request timed out{}", .timeout.map(|t| format!(" after {:?}", t)).unwrap_or_default())]
    Timeout { timeout: Option<Duration> },

    #[error("Server returned status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("GraphQL error: {message}")]
    GraphQL { message: String },

    #[error("Invalid response from backend: {details}")]
    InvalidResponse { details: String },

    #[error("Client configuration error: {message}")]
    Configuration { message: String },
}

impl SubmitError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        SubmitError::Validation {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        SubmitError::Network {
            message: message.into(),
        }
    }

    /// Create a timeout error for an expired request limit
    pub fn timeout(timeout: Duration) -> Self {
        SubmitError::Timeout {
            timeout: Some(timeout),
        }
    }

    /// Create a server error for a non-success HTTP status
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        SubmitError::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a GraphQL execution error
    pub fn graphql(message: impl Into<String>) -> Self {
        SubmitError::GraphQL {
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(details: impl Into<String>) -> Self {
        SubmitError::InvalidResponse {
            details: details.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SubmitError::Configuration {
            message: message.into(),
        }
    }

    /// Category used for retry decisions and user-facing messages
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::Transport,
        }
    }

    /// Check if this error is a validation-kind rejection
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        !self.is_validation()
    }
}

/// Whether an error originated in the HTTP transport layer.
///
/// Lets callers separate request-layer failures from payload validation
/// without depending on `reqwest` types.
pub fn is_transport_error(error: &SubmitError) -> bool {
    matches!(
        error,
        SubmitError::Network { .. }
            | SubmitError::Timeout { .. }
            | SubmitError::Server { .. }
            | SubmitError::InvalidResponse { .. }
    )
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SubmitError::Timeout { timeout: None }
        } else if err.is_decode() {
            SubmitError::invalid_response(err.to_string())
        } else if let Some(status) = err.status() {
            SubmitError::server(status.as_u16(), err.to_string())
        } else {
            SubmitError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SubmitError {
    fn from(err: serde_json::Error) -> Self {
        SubmitError::invalid_response(format!("JSON parsing error: {}", err))
    }
}

impl From<url::ParseError> for SubmitError {
    fn from(err: url::ParseError) -> Self {
        SubmitError::config(format!("Invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_not_retryable() {
        let error = SubmitError::validation("email is malformed");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(!error.is_retryable());
        assert!(!is_transport_error(&error));
    }

    #[test]
    fn test_transport_errors_are_retryable() {
        let errors = vec![
            SubmitError::network("connection refused"),
            SubmitError::timeout(Duration::from_secs(5)),
            SubmitError::server(503, "Service Unavailable"),
            SubmitError::invalid_response("truncated body"),
        ];

        for error in errors {
            assert_eq!(error.kind(), ErrorKind::Transport);
            assert!(error.is_retryable());
            assert!(is_transport_error(&error));
        }
    }

    #[test]
    fn test_graphql_error_is_retryable_but_not_transport() {
        let error = SubmitError::graphql("Internal server error");
        assert!(error.is_retryable());
        assert!(!is_transport_error(&error));
    }

    #[test]
    fn test_error_display() {
        let error = SubmitError::server(502, "Bad Gateway");
        assert_eq!(error.to_string(), "Server returned status 502: Bad Gateway");

        let error = SubmitError::timeout(Duration::from_millis(1500));
        assert_eq!(error.to_string(), "Request timed out after 1.5s");

        let error = SubmitError::Timeout { timeout: None };
        assert_eq!(error.to_string(), "Request timed out");
    }
}
