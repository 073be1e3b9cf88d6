//! Breaker-gated, retried connection to one debugger endpoint.
//!
//! One breaker-gated call covers the first attempt plus the configured
//! retries; the breaker records a single success or failure per call.

use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;

use parking_lot::Mutex;
use sightline_config::CdpConfig;
use sightline_core::{BreakerPolicy, CircuitBreaker, CircuitState, RetryPolicy};
use sightline_protocols::ConnectionError;
use tracing::{debug, instrument, warn};

use crate::cdp::{BrowserVersion, CdpClient, CdpError};

/// Connection factory for a single `host:port`.
pub struct CdpConnector {
    host: String,
    port: u16,
    connect_timeout: Duration,
    request_timeout: Duration,
    http: reqwest::Client,
    retry: RetryPolicy,
    breaker: Mutex<CircuitBreaker>,
}

impl CdpConnector {
    pub fn new(host: impl Into<String>, port: u16, config: &CdpConfig, breaker: BreakerPolicy) -> Self {
        let host = host.into();
        let http = reqwest::Client::builder()
            .timeout(config.connect_timeout())
            .build()
            .unwrap_or_default();
        Self {
            breaker: Mutex::new(CircuitBreaker::new(format!("cdp {host}:{port}"), breaker)),
            host,
            port,
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            http,
            retry: RetryPolicy::new(config.retries, config.backoff_base()),
        }
    }

    /// Connector for the configured `[cdp]` endpoint.
    pub fn from_config(config: &CdpConfig, breaker: BreakerPolicy) -> Self {
        Self::new(config.host.clone(), config.port, config, breaker)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.lock().state()
    }

    /// Close the breaker after the endpoint was repaired out of band.
    pub fn reset_breaker(&self) {
        self.breaker.lock().record_success();
    }

    /// Connect, failing fast while the breaker is open.
    #[instrument(skip(self), fields(endpoint = %self.endpoint()))]
    pub async fn connect(&self) -> Result<CdpClient, ConnectionError> {
        if let Err(open) = self.breaker.lock().check() {
            debug!(retry_in_ms = open.retry_in.as_millis() as u64, "Circuit open, not connecting");
            return Err(ConnectionError::CircuitOpen {
                endpoint: self.endpoint(),
                retry_in_ms: open.retry_in.as_millis() as u64,
            });
        }

        let result = self.retry.run(|_| self.connect_once(), |_| true).await;

        let mut breaker = self.breaker.lock();
        match &result {
            Ok(_) => breaker.record_success(),
            Err(e) => {
                warn!(error = %e, "Debugger connection failed");
                breaker.record_failure();
            }
        }
        result
    }

    /// `GET /json/version`: succeeds only when debugging is enabled.
    pub async fn probe_version(&self) -> Result<BrowserVersion, ConnectionError> {
        let url = format!("{}/json/version", self.http_endpoint());
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_http(&self.endpoint(), &e))?;

        if !response.status().is_success() {
            return Err(ConnectionError::NotEnabled(format!(
                "{} answered {} to /json/version",
                self.endpoint(),
                response.status()
            )));
        }

        response.json::<BrowserVersion>().await.map_err(|e| {
            if e.is_timeout() {
                ConnectionError::Timeout(format!("{}: {}", self.endpoint(), e))
            } else {
                ConnectionError::NotEnabled(format!(
                    "{} has no debugger URL: {}",
                    self.endpoint(),
                    e
                ))
            }
        })
    }

    async fn connect_once(&self) -> Result<CdpClient, ConnectionError> {
        let version = self.probe_version().await?;
        debug!(browser = %version.browser, "Debugger endpoint reachable");

        let connect = CdpClient::connect(&version.web_socket_debugger_url, self.request_timeout);
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(client)) => Ok(client),
            Ok(Err(e)) => Err(classify_cdp(&self.endpoint(), e)),
            Err(_) => Err(ConnectionError::Timeout(format!(
                "{}: WebSocket connect exceeded {}ms",
                self.endpoint(),
                self.connect_timeout.as_millis()
            ))),
        }
    }
}

/// Map an HTTP failure: refused → NotEnabled, timeout → Timeout, else ConnectionFailed.
pub(crate) fn classify_http(endpoint: &str, e: &reqwest::Error) -> ConnectionError {
    let message = format!("{endpoint}: {e}");
    if e.is_timeout() {
        ConnectionError::Timeout(message)
    } else if is_connection_refused(e) {
        ConnectionError::NotEnabled(message)
    } else {
        ConnectionError::ConnectionFailed(message)
    }
}

fn classify_cdp(endpoint: &str, e: CdpError) -> ConnectionError {
    let message = format!("{endpoint}: {e}");
    match e {
        CdpError::Timeout(_) => ConnectionError::Timeout(message),
        CdpError::WebSocket(ref detail) if mentions_refused(detail) => {
            ConnectionError::NotEnabled(message)
        }
        _ => ConnectionError::ConnectionFailed(message),
    }
}

/// Walk the source chain looking for `ECONNREFUSED`.
pub(crate) fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let refused = e
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::ConnectionRefused);
        if refused || mentions_refused(&e.to_string()) {
            return true;
        }
        current = e.source();
    }
    false
}

fn mentions_refused(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    text.contains("connection refused") || text.contains("actively refused")
}

#[cfg(test)]
#[path = "connector_tests.rs"]
mod tests;
