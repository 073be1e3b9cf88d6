//! Source-level discovery errors.

use thiserror::Error;

use super::{BridgeError, ConnectionError};
use crate::strategy::Strategy;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No source is registered for the requested technique.
    #[error("Discovery source unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Debugger-protocol round trip failed after connecting.
    #[error("Debugger protocol error: {0}")]
    Protocol(String),

    #[error("Discovery helper failed: {0}")]
    Helper(String),

    /// Every source in the fallback chain failed.
    #[error("All discovery sources failed for strategy {strategy}: {last}")]
    Exhausted { strategy: Strategy, last: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_connection_error() {
        let err: DiscoveryError = ConnectionError::Timeout("5s".to_string()).into();
        assert!(matches!(err, DiscoveryError::Connection(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_exhausted_display() {
        let err = DiscoveryError::Exhausted {
            strategy: Strategy::Browser,
            last: "refused".to_string(),
        };
        assert!(err.to_string().contains("browser"));
        assert!(err.to_string().contains("refused"));
    }
}
