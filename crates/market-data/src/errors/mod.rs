//! Error types for the market data crate.

use thiserror::Error;

use crate::queue::QueueError;

/// Errors that can occur while fetching market data.
///
/// None of these reach the portfolio layer directly: the resolver converts
/// every failure into [`MarketLookup::NotFound`](crate::MarketLookup::NotFound)
/// and logs it.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider's payload could not be parsed or lacks required fields.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that sent the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The request never produced a result in the request queue.
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Type alias for Result using [`MarketDataError`].
pub type Result<T> = std::result::Result<T, MarketDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::RateLimited {
            provider: "DEXSCREENER".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: DEXSCREENER");

        let error = MarketDataError::ProviderError {
            provider: "DEXSCREENER".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: DEXSCREENER - HTTP 500");

        let error = MarketDataError::from(QueueError::TaskPanicked);
        assert_eq!(format!("{}", error), "Queue error: Queued task panicked");
    }
}
