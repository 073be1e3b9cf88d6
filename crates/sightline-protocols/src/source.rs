//! Discovery source trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::element::UIElement;
use crate::error::DiscoveryError;
use crate::window::WindowTarget;

/// Technique a [`DiscoverySource`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Platform accessibility tree walk.
    Accessibility,
    /// Document-search sweep over the accessibility API.
    DocumentSearch,
    /// Legacy accessibility API sweep.
    LegacyAccessibility,
    /// Embedded web view content.
    EmbeddedWebview,
    /// Application-frame hosted apps.
    UwpShell,
    /// Desktop shell and taskbar.
    Shell,
    /// Browser debugger protocol.
    Browser,
    /// Game bridge.
    GameBridge,
}

impl SourceKind {
    pub const ALL: [SourceKind; 8] = [
        SourceKind::Accessibility,
        SourceKind::DocumentSearch,
        SourceKind::LegacyAccessibility,
        SourceKind::EmbeddedWebview,
        SourceKind::UwpShell,
        SourceKind::Shell,
        SourceKind::Browser,
        SourceKind::GameBridge,
    ];

    /// Parse the kebab-case name used in configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Accessibility => "accessibility",
            SourceKind::DocumentSearch => "document-search",
            SourceKind::LegacyAccessibility => "legacy-accessibility",
            SourceKind::EmbeddedWebview => "embedded-webview",
            SourceKind::UwpShell => "uwp-shell",
            SourceKind::Shell => "shell",
            SourceKind::Browser => "browser",
            SourceKind::GameBridge => "game-bridge",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of pulling elements out of a window.
///
/// Implementations return elements already normalized to screen coordinates
/// with positive size. "Nothing found" is `Ok(vec![])`, not an error.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Which technique this source implements.
    fn kind(&self) -> SourceKind;

    /// Discover elements in the target window.
    async fn run(&self, target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_names_round_trip() {
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::from_name(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(SourceKind::from_name(" Legacy-Accessibility "), Some(SourceKind::LegacyAccessibility));
        assert_eq!(SourceKind::from_name("uia"), None);
    }
}
