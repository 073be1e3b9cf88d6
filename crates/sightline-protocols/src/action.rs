//! Verified-action request and result types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Physical action performed at a located coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    DoubleClick,
    RightClick,
    /// Click the target, then type the text.
    Type(String),
}

impl ActionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::DoubleClick => "double-click",
            ActionKind::RightClick => "right-click",
            ActionKind::Type(_) => "type into",
        }
    }
}

/// Options for one verified-action invocation.
#[derive(Debug, Clone)]
pub struct SmartActOptions {
    pub max_attempts: u32,
    pub verify_delay: Duration,
    /// Locations reported below this confidence count as a failed attempt.
    pub min_confidence: f32,
    /// What the caller expects to change; defaults to a sentence built from the action.
    pub expectation: Option<String>,
}

impl Default for SmartActOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            verify_delay: Duration::from_millis(800),
            min_confidence: 0.5,
            expectation: None,
        }
    }
}

/// Where the vision collaborator found a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Located {
    pub x: i32,
    pub y: i32,
    pub confidence: f32,
}

/// The vision collaborator's verdict on a before/after pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub changed: bool,
    #[serde(default)]
    pub reason: String,
}

/// Outcome of one verified-action invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartClickResult {
    pub success: bool,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(i32, i32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SmartClickResult {
    pub fn succeeded(attempts: u32, located: Located) -> Self {
        Self {
            success: true,
            attempts,
            coordinates: Some((located.x, located.y)),
            confidence: Some(located.confidence),
            error: None,
        }
    }

    pub fn failed(attempts: u32, error: Option<String>) -> Self {
        Self {
            success: false,
            attempts,
            coordinates: None,
            confidence: None,
            error,
        }
    }
}
