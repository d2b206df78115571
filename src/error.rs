//! Error types for Engager
//!
//! Centralized error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

/// All error types that can occur in Engager
#[derive(Debug, Error)]
pub enum EngageError {
    /// Authentication failed for a reason other than a challenge
    #[error("Authentication failed: {0}")]
    FatalAuth(String),

    /// The remote service wants a human-supplied security code
    #[error("Challenge required")]
    ChallengeRequired,

    /// The remote service is throttling us
    #[error("Rate limited, cooling down for {}s", cooldown.as_secs())]
    RateLimited { cooldown: Duration },

    /// A single remote action failed; the item is abandoned
    #[error("Action failed: {0}")]
    TransientAction(String),

    /// Configuration rejected at startup
    #[error("Invalid config: {0}")]
    ConfigValidation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngageError {
    /// Whether this error should stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngageError::FatalAuth(_) | EngageError::ConfigValidation(_))
    }
}

/// Result type alias for Engager operations
pub type Result<T> = std::result::Result<T, EngageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_auth_error() {
        let err = EngageError::FatalAuth("bad password".to_string());
        assert_eq!(err.to_string(), "Authentication failed: bad password");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = EngageError::RateLimited {
            cooldown: Duration::from_secs(1800),
        };
        assert_eq!(err.to_string(), "Rate limited, cooling down for 1800s");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_validation_error() {
        let err = EngageError::ConfigValidation("comments must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid config: comments must not be empty");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_transient_action_not_fatal() {
        let err = EngageError::TransientAction("media deleted".to_string());
        assert!(!err.is_fatal());
        assert!(!EngageError::ChallengeRequired.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngageError = io_err.into();
        assert!(matches!(err, EngageError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}
