//! Verified-action and kill-switch configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Verified-action loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Case-insensitive regexes; matching descriptions are refused.
    #[serde(default)]
    pub restricted_patterns: Vec<String>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            verify_delay_ms: default_verify_delay_ms(),
            min_confidence: default_min_confidence(),
            restricted_patterns: Vec::new(),
        }
    }
}

impl ActionConfig {
    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }
}

/// Kill-switch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillSwitchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Pointer displacement that counts as operator takeover.
    #[serde(default = "default_threshold_px")]
    pub threshold_px: f64,

    /// Window after a self-initiated move during which checks are skipped.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for KillSwitchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_px: default_threshold_px(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl KillSwitchConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_verify_delay_ms() -> u64 {
    800
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_threshold_px() -> f64 {
    50.0
}

fn default_cooldown_ms() -> u64 {
    300
}
