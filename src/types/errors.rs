//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.
//!
//! Per-trial failures during calibration are *data* (a failed attempt record),
//! not errors: only catalog-level failures and full fallback-chain exhaustion
//! surface through this enum.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the calibrator.
#[derive(Error, Debug)]
pub enum Error {
    /// A server's tool catalog could not be obtained. Fatal to that server's
    /// calibration pass only.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// The agent collaborator rejected or failed an invocation.
    #[error("agent error: {0}")]
    Agent(String),

    /// An invocation exceeded its wall-clock budget.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Every strategy in the selected fallback chain failed.
    #[error("fallback chain exhausted for '{}': tried {}", .tool, .attempted.join(", "))]
    ChainExhausted {
        tool: String,
        attempted: Vec<String>,
    },

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors from the agent backend.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

// Convenience constructors
impl Error {
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
