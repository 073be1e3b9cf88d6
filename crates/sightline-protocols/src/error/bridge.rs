//! Game-bridge errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Nothing is listening on the bridge port.
    #[error("Game bridge not running at {0}")]
    NotRunning(String),

    #[error("Game bridge timed out: {0}")]
    Timeout(String),

    /// Malformed framing or payload.
    #[error("Game bridge protocol error: {0}")]
    ProtocolError(String),

    #[error("Game bridge circuit open, retry in {retry_in_ms}ms")]
    CircuitOpen { retry_in_ms: u64 },

    #[error("Game bridge I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::ProtocolError("frame too large".to_string());
        assert!(err.to_string().contains("frame too large"));

        let err = BridgeError::NotRunning("127.0.0.1:9876".to_string());
        assert!(err.to_string().contains("9876"));
    }
}
