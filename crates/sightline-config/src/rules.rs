//! Strategy rule table.
//!
//! JSON document shape:
//!
//! ```json
//! {
//!   "strategies": { "browser": { "description": "..." } },
//!   "windowClasses": { "ApplicationFrameWindow": "uwp-shell" },
//!   "processNames": { "chrome.exe": "browser" },
//!   "fallback": "native"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sightline_protocols::Strategy;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Data-driven window class / process name → strategy lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    /// Descriptive metadata, not used for lookup.
    #[serde(default)]
    pub strategies: HashMap<String, serde_json::Value>,

    #[serde(default)]
    pub window_classes: BTreeMap<String, Strategy>,

    #[serde(default)]
    pub process_names: BTreeMap<String, Strategy>,

    #[serde(default = "default_fallback")]
    pub fallback: Strategy,
}

fn default_fallback() -> Strategy {
    Strategy::Native
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl RuleTable {
    /// Empty table with `native` fallback.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            window_classes: BTreeMap::new(),
            process_names: BTreeMap::new(),
            fallback: Strategy::Native,
        }
    }

    /// Parse a rule table from JSON.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a rule table from disk.
    ///
    /// A missing or unparseable file yields the empty table.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Rule table {} unreadable ({}), using empty table", path.display(), e);
                return Self::empty();
            }
        };
        match Self::from_json(&content) {
            Ok(table) => {
                debug!(
                    "Loaded rule table {}: {} window classes, {} process names",
                    path.display(),
                    table.window_classes.len(),
                    table.process_names.len()
                );
                table
            }
            Err(e) => {
                warn!("Rule table {} invalid ({}), using empty table", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Built-in rules used when no rule file is configured.
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        for class in ["ApplicationFrameWindow", "Windows.UI.Core.CoreWindow"] {
            table.window_classes.insert(class.to_string(), Strategy::UwpShell);
        }
        table
            .window_classes
            .insert("Shell_TrayWnd".to_string(), Strategy::Shell);

        let browsers = [
            "chrome", "chrome.exe", "google chrome", "msedge", "msedge.exe", "microsoft edge",
            "brave", "brave.exe", "brave browser", "chromium", "chromium-browser", "opera",
            "opera.exe", "vivaldi", "vivaldi.exe",
        ];
        for name in browsers {
            table.process_names.insert(name.to_string(), Strategy::Browser);
        }

        let electron = [
            "code", "code.exe", "slack", "slack.exe", "discord", "discord.exe", "teams",
            "ms-teams.exe", "notion", "notion.exe", "obsidian", "obsidian.exe",
        ];
        for name in electron {
            table.process_names.insert(name.to_string(), Strategy::ElectronStyle);
        }

        table
    }

    /// Case-insensitive exact process-name lookup.
    pub fn lookup_process(&self, process_name: &str) -> Option<Strategy> {
        lookup_ci(&self.process_names, process_name)
    }

    /// Case-insensitive exact window-class lookup.
    pub fn lookup_class(&self, window_class: &str) -> Option<Strategy> {
        lookup_ci(&self.window_classes, window_class)
    }

    /// Substring match in either direction against window-class rules.
    ///
    /// When several rules match, the longest rule key wins.
    pub fn match_class_substring(&self, window_class: &str) -> Option<Strategy> {
        if window_class.is_empty() {
            return None;
        }
        let needle = window_class.to_lowercase();
        self.window_classes
            .iter()
            .filter(|(key, _)| {
                let key = key.to_lowercase();
                !key.is_empty() && (needle.contains(&key) || key.contains(&needle))
            })
            .max_by_key(|(key, _)| key.len())
            .map(|(_, strategy)| *strategy)
    }
}

fn lookup_ci(map: &BTreeMap<String, Strategy>, key: &str) -> Option<Strategy> {
    if key.is_empty() {
        return None;
    }
    if let Some(strategy) = map.get(key) {
        return Some(*strategy);
    }
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, strategy)| *strategy)
}
