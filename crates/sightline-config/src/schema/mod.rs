//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_action;
mod schema_discovery;
mod schema_remote;

pub use schema_action::*;
pub use schema_discovery::*;
pub use schema_remote::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub cdp: CdpConfig,

    #[serde(default)]
    pub breaker: BreakerConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub recovery: RecoveryConfig,

    #[serde(default)]
    pub action: ActionConfig,

    #[serde(default)]
    pub kill_switch: KillSwitchConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    sightline_dir().join("logs")
}

/// The `~/.sightline` directory.
pub fn sightline_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".sightline"))
        .unwrap_or_else(|| PathBuf::from(".sightline"))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
