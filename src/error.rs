//! Crate-wide error type
//!
//! The signal engine never errors (degenerate input yields neutral
//! defaults); everything that touches the network, the session store or
//! the wallet reports through `ArcadeError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// A market-data or news provider returned a non-success response
    #[error("provider {provider} request failed: {message}")]
    Provider { provider: &'static str, message: String },

    /// Transport-level HTTP failure
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider or model payload did not match the expected shape
    #[error("failed to parse payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The hosted model replied with something unusable
    #[error("model error: {0}")]
    Model(String),

    /// Wallet operation attempted without a logged-in session
    #[error("no active session")]
    NotLoggedIn,

    /// Wallet balance cannot cover the requested amount
    #[error("insufficient balance: needed {needed:.2}, available {available:.2}")]
    InsufficientBalance { needed: f64, available: f64 },

    /// Stake or top-up amount outside the allowed range
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Session storage backend failure
    #[error("session storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
