//! Error types for the backend client.

use luna_core::LunaError;

/// Errors from the chat backend.
///
/// Callers on the chat side absorb every variant into a fallback answer;
/// the distinction only matters for logging.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (DNS, connect, timeout, bad TLS).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success HTTP status.
    #[error("api error: {0}")]
    Api(String),
    /// The server answered 200 but reported `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<BackendError> for LunaError {
    fn from(err: BackendError) -> Self {
        LunaError::Api(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::Api("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "api error: 503 Service Unavailable");

        let err = BackendError::Rejected("no FAQ matched".to_string());
        assert_eq!(err.to_string(), "rejected: no FAQ matched");
    }

    #[test]
    fn test_conversion_to_luna_error() {
        let err = BackendError::Api("boom".to_string());
        let luna: LunaError = err.into();
        assert!(matches!(luna, LunaError::Api(_)));
        assert!(luna.to_string().contains("boom"));
    }
}
