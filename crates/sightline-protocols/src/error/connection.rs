//! Debugger-protocol connection errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The endpoint refused the connection: the debugging flag is absent.
    #[error("Remote debugging not enabled at {0}")]
    NotEnabled(String),

    #[error("Connection timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The client's breaker is open; no I/O was attempted.
    #[error("Circuit breaker open for {endpoint}, retry in {retry_in_ms}ms")]
    CircuitOpen { endpoint: String, retry_in_ms: u64 },
}

impl ConnectionError {
    pub fn is_not_enabled(&self) -> bool {
        matches!(self, ConnectionError::NotEnabled(_))
    }
}
