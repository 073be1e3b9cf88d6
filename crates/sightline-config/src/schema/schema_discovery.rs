//! Discovery and helper configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Strategy dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// JSON rule table. When absent the built-in table is used.
    #[serde(default)]
    pub rules_file: Option<PathBuf>,

    /// Results below this size trigger the fallback chain.
    #[serde(default = "default_min_elements")]
    pub min_elements: usize,

    #[serde(default = "default_helper_timeout_ms")]
    pub helper_timeout_ms: u64,

    /// Subprocess helpers keyed by source name (`accessibility`,
    /// `document-search`, `legacy-accessibility`, `embedded-webview`,
    /// `uwp-shell`, `shell`).
    #[serde(default)]
    pub helpers: HashMap<String, HelperConfig>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            rules_file: None,
            min_elements: default_min_elements(),
            helper_timeout_ms: default_helper_timeout_ms(),
            helpers: HashMap::new(),
        }
    }
}

impl DiscoveryConfig {
    pub fn helper_timeout(&self) -> Duration {
        Duration::from_millis(self.helper_timeout_ms)
    }
}

fn default_min_elements() -> usize {
    10
}

fn default_helper_timeout_ms() -> u64 {
    5_000
}

/// One external discovery helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfig {
    pub program: PathBuf,

    /// Arguments; `{window}`, `{class}`, `{process}` and `{pid}` are substituted.
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-helper timeout override.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
