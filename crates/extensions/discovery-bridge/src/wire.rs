//! Payload carried inside a bridge frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sightline_protocols::{Rect, UIElement};

/// One bridge response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub game_info: GameInfo,
    #[serde(default)]
    pub elements: Vec<WireElement>,
    #[serde(default)]
    pub timestamp: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WireRect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// A scene-graph node as the bridge reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireElement {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub name: String,
    /// Hierarchy path, e.g. `Canvas/MainMenu/PlayButton`.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub screen_rect: WireRect,
    #[serde(default)]
    pub is_interactable: bool,
    #[serde(default = "visible")]
    pub is_visible: bool,
    pub value: Option<String>,
    pub automation_id: Option<String>,
}

fn visible() -> bool {
    true
}

impl WireElement {
    /// Invisible and zero-size nodes yield `None`. The path goes to
    /// `description` to tell same-named nodes apart.
    pub fn into_element(self) -> Option<UIElement> {
        if !self.is_visible {
            return None;
        }
        let r = self.screen_rect;
        let element_type = if self.element_type.is_empty() {
            "Control".to_string()
        } else {
            self.element_type
        };
        UIElement::from_parts(
            element_type,
            self.name,
            Rect::new(r.x, r.y, r.width, r.height),
            self.is_interactable,
        )
        .map(|e| {
            e.with_description(Some(self.path))
                .with_value(self.value)
                .with_automation_id(self.automation_id)
        })
    }
}
