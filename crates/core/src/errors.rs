//! Core error types for walletlens.
//!
//! Only two failures are ever shown to a user: a malformed address and a
//! failed ledger call. Per-holding enrichment misses are absorbed by the
//! aggregator and counted, never raised.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a valid base58 Solana address.
    #[error("Invalid wallet address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The ledger could not be queried. Terminal for the query.
    #[error("Failed to load wallet balances: {0}")]
    DiscoveryFailed(#[from] LedgerError),

    /// The query was superseded by a newer one before it finished.
    #[error("Query was cancelled")]
    QueryCancelled,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised at the ledger RPC boundary.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The RPC endpoint could not be reached or timed out.
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The ledger did not answer within the query deadline.
    #[error("RPC request timed out")]
    Timeout,

    /// The endpoint answered with a non-success HTTP status.
    #[error("RPC endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The payload could not be decoded.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl Error {
    pub fn invalid_address(address: &str, reason: impl ToString) -> Self {
        Error::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}
