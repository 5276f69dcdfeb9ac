//! Error types for SatLens

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SatlensError {
    // Transport errors
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP error! status: {status}")]
    Http { status: u16, message: Option<String> },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    // Input errors
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SatlensError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    /// HTTP status code, when the backend produced a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SatlensError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all
    pub fn is_network(&self) -> bool {
        matches!(self, SatlensError::Network { .. })
    }
}

pub type Result<T> = std::result::Result<T, SatlensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = SatlensError::Http { status: 500, message: Some("boom".to_string()) };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = SatlensError::Network { message: "connection refused".to_string() };
        assert_eq!(err.status(), None);
        assert!(err.is_network());
    }
}
