//! Random number port - Interface to a source of unpredictable numbers
//!
//! The same trait is implemented by the raw HTTP client (one network attempt
//! per call) and by the resilient decorator that adds retry, circuit breaking
//! and local fallback on top of it.

use std::num::NonZeroU32;

use async_trait::async_trait;

use crate::application::cancellation::CancelToken;

#[derive(Debug, thiserror::Error)]
pub enum RandomNumberError {
    #[error("random number service timed out")]
    Timeout,
    #[error("random number service connection failed: {0}")]
    Connection(String),
    #[error("random number service returned status {0}")]
    Status(u16),
    #[error("random number service returned an unusable body: {0:?}")]
    MalformedBody(String),
    #[error("random number service circuit is open")]
    CircuitOpen,
    #[error("random number source unavailable")]
    Unavailable,
    #[error("random number request cancelled")]
    Cancelled,
}

impl RandomNumberError {
    /// Failures worth retrying and counting against the circuit breaker
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) | Self::MalformedBody(_) => true,
            Self::Status(code) => *code >= 500 || *code == 408,
            Self::CircuitOpen | Self::Unavailable | Self::Cancelled => false,
        }
    }
}

#[async_trait]
pub trait RandomNumberPort: Send + Sync {
    /// Produce a positive random number
    async fn random_number(&self, cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RandomNumberError::Timeout.is_transient());
        assert!(RandomNumberError::Connection("refused".into()).is_transient());
        assert!(RandomNumberError::MalformedBody("abc".into()).is_transient());
        assert!(RandomNumberError::Status(500).is_transient());
        assert!(RandomNumberError::Status(503).is_transient());
        assert!(RandomNumberError::Status(408).is_transient());

        assert!(!RandomNumberError::Status(404).is_transient());
        assert!(!RandomNumberError::Status(429).is_transient());
        assert!(!RandomNumberError::CircuitOpen.is_transient());
        assert!(!RandomNumberError::Cancelled.is_transient());
        assert!(!RandomNumberError::Unavailable.is_transient());
    }
}
