//! Client for the in-game bridge.
//!
//! The bridge writes one frame per accepted connection; the client sends
//! nothing. Each client owns its own breaker, separate from the debugger
//! connection's.

use std::io;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use sightline_config::BridgeConfig;
use sightline_core::{BreakerPolicy, CircuitBreaker, CircuitState};
use sightline_protocols::{BridgeError, UIElement};
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

use crate::framing::read_frame;
use crate::wire::{BridgeMessage, GameInfo, WireElement};

/// Elements and scene info from one bridge read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSnapshot {
    pub game_info: GameInfo,
    pub elements: Vec<UIElement>,
}

/// True when something accepts TCP connections at `host:port` within
/// `timeout`. The probe connection is closed immediately.
pub async fn is_available(host: &str, port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            debug!(host, port, error = %e, "Bridge probe refused");
            false
        }
        Err(_) => {
            debug!(host, port, "Bridge probe timed out");
            false
        }
    }
}

pub struct BridgeClient {
    host: String,
    port: u16,
    read_timeout: Duration,
    probe_timeout: Duration,
    breaker: Mutex<CircuitBreaker>,
}

impl BridgeClient {
    pub fn new(config: &BridgeConfig, breaker: BreakerPolicy) -> Self {
        Self {
            breaker: Mutex::new(CircuitBreaker::new(
                format!("bridge {}:{}", config.host, config.port),
                breaker,
            )),
            host: config.host.clone(),
            port: config.port,
            read_timeout: config.read_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.lock().state()
    }

    pub async fn is_available(&self) -> bool {
        is_available(&self.host, self.port, self.probe_timeout).await
    }

    /// Read the bridge's current scene, failing fast while the breaker is open.
    #[instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn get_elements(&self) -> Result<BridgeSnapshot, BridgeError> {
        if let Err(open) = self.breaker.lock().check() {
            return Err(BridgeError::CircuitOpen {
                retry_in_ms: open.retry_in.as_millis() as u64,
            });
        }

        let result = match tokio::time::timeout(self.read_timeout, self.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout(format!(
                "{}: no frame within {}ms",
                self.endpoint(),
                self.read_timeout.as_millis()
            ))),
        };

        let mut breaker = self.breaker.lock();
        match &result {
            Ok(snapshot) => {
                breaker.record_success();
                debug!(elements = snapshot.elements.len(), scene = %snapshot.game_info.scene, "Bridge read");
            }
            Err(e) => {
                breaker.record_failure();
                warn!(error = %e, "Bridge read failed");
            }
        }
        result
    }

    async fn fetch(&self) -> Result<BridgeSnapshot, BridgeError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| self.classify_connect(e))?;

        let frame = read_frame(stream).await?;
        let message: BridgeMessage = serde_json::from_slice(&frame)
            .map_err(|e| BridgeError::ProtocolError(format!("invalid payload: {e}")))?;

        let total = message.elements.len();
        let elements: Vec<UIElement> = message
            .elements
            .into_iter()
            .filter_map(WireElement::into_element)
            .collect();
        if elements.len() < total {
            debug!(dropped = total - elements.len(), "Dropped hidden or empty bridge elements");
        }

        Ok(BridgeSnapshot {
            game_info: message.game_info,
            elements,
        })
    }

    fn classify_connect(&self, error: io::Error) -> BridgeError {
        match error.kind() {
            io::ErrorKind::ConnectionRefused => BridgeError::NotRunning(self.endpoint()),
            io::ErrorKind::TimedOut => BridgeError::Timeout(format!("{}: {error}", self.endpoint())),
            _ => BridgeError::Io(format!("{}: {error}", self.endpoint())),
        }
    }
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("endpoint", &self.endpoint())
            .finish_non_exhaustive()
    }
}
