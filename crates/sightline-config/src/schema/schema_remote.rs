//! Remote-connection configuration: debugger protocol, breaker, bridge, recovery.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{default_true, sightline_dir};

/// Debugger-protocol client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpConfig {
    #[serde(default = "default_loopback")]
    pub host: String,

    #[serde(default = "default_debug_port")]
    pub port: u16,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries after the first connect attempt.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            host: default_loopback(),
            port: default_debug_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            retries: default_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl CdpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

/// Circuit breaker thresholds shared by every remote client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    #[serde(default = "default_reset_window_secs")]
    pub reset_window_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            reset_window_secs: default_reset_window_secs(),
        }
    }
}

impl BreakerConfig {
    pub fn reset_window(&self) -> Duration {
        Duration::from_secs(self.reset_window_secs)
    }
}

/// Game-bridge client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_loopback")]
    pub host: String,

    #[serde(default = "default_bridge_port")]
    pub port: u16,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_loopback(),
            port: default_bridge_port(),
            read_timeout_ms: default_read_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl BridgeConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Browser recovery saga configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Port the relaunched browser listens on.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Wipe and re-copy the dedicated profile on every recovery.
    #[serde(default = "default_true")]
    pub resync_profile: bool,

    /// Parent of the dedicated per-browser profiles.
    #[serde(default = "default_profile_root")]
    pub profile_root: PathBuf,

    #[serde(default = "default_close_wait_ms")]
    pub close_wait_ms: u64,

    #[serde(default = "default_startup_wait_ms")]
    pub startup_wait_ms: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debug_port: default_debug_port(),
            resync_profile: true,
            profile_root: default_profile_root(),
            close_wait_ms: default_close_wait_ms(),
            startup_wait_ms: default_startup_wait_ms(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl RecoveryConfig {
    pub fn close_wait(&self) -> Duration {
        Duration::from_millis(self.close_wait_ms)
    }

    pub fn startup_wait(&self) -> Duration {
        Duration::from_millis(self.startup_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Dedicated profile directory for one browser family.
    pub fn profile_dir(&self, browser: &str) -> PathBuf {
        self.profile_root.join(browser)
    }
}

fn default_loopback() -> String {
    "127.0.0.1".to_string()
}

fn default_debug_port() -> u16 {
    9222
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_threshold() -> u32 {
    3
}

fn default_reset_window_secs() -> u64 {
    30
}

fn default_bridge_port() -> u16 {
    9876
}

fn default_read_timeout_ms() -> u64 {
    3_000
}

fn default_probe_timeout_ms() -> u64 {
    500
}

fn default_profile_root() -> PathBuf {
    sightline_dir().join("browser-profiles")
}

fn default_close_wait_ms() -> u64 {
    2_000
}

fn default_startup_wait_ms() -> u64 {
    3_000
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    1_000
}
