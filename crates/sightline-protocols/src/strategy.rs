//! Discovery strategy tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Technique used to discover UI elements in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Native accessibility tree.
    Native,
    /// Web content hosted inside a native window.
    #[serde(alias = "webview", alias = "webview2")]
    EmbeddedWebview,
    /// Chromium-shell desktop apps (Electron and friends).
    #[serde(alias = "electron")]
    ElectronStyle,
    /// Application-frame hosted apps.
    #[serde(alias = "uwp")]
    UwpShell,
    /// A Chromium-family browser reached over its debugger protocol.
    #[serde(alias = "cdp", alias = "chrome")]
    Browser,
    /// A game engine exposing its scene graph through the bridge.
    #[serde(alias = "game", alias = "unity")]
    GameBridge,
    /// No focused window: desktop shell and taskbar.
    #[serde(alias = "taskbar")]
    Shell,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::Native,
        Strategy::EmbeddedWebview,
        Strategy::ElectronStyle,
        Strategy::UwpShell,
        Strategy::Browser,
        Strategy::GameBridge,
        Strategy::Shell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Native => "native",
            Strategy::EmbeddedWebview => "embedded-webview",
            Strategy::ElectronStyle => "electron-style",
            Strategy::UwpShell => "uwp-shell",
            Strategy::Browser => "browser",
            Strategy::GameBridge => "game-bridge",
            Strategy::Shell => "shell",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| format!("Unknown strategy: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_strategy_aliases() {
        assert_eq!("webview2".parse::<Strategy>().unwrap(), Strategy::EmbeddedWebview);
        assert_eq!("Electron".parse::<Strategy>().unwrap(), Strategy::ElectronStyle);
        assert_eq!("cdp".parse::<Strategy>().unwrap(), Strategy::Browser);
        assert_eq!("unity".parse::<Strategy>().unwrap(), Strategy::GameBridge);
    }

    #[test]
    fn test_strategy_unknown() {
        assert!("quantum".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_serialize() {
        let json = serde_json::to_string(&Strategy::GameBridge).unwrap();
        assert_eq!(json, "\"game-bridge\"");
    }
}
