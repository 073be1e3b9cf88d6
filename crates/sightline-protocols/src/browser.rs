//! Browser detection result.

use serde::{Deserialize, Serialize};

/// A running browser window and its debugging state.
///
/// Recomputed on every detection call; debugging state can change between
/// calls (for example after a recovery saga).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInfo {
    /// Browser family, e.g. "chrome" or "edge".
    #[serde(rename = "type")]
    pub browser_type: String,
    pub process_id: u32,
    pub debug_port: Option<u16>,
    pub is_debugging_enabled: bool,
    pub window_title: String,
    pub window_class: String,
}
