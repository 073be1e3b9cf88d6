//! Discovery result for a single window.

use serde::{Deserialize, Serialize};

use crate::element::UIElement;
use crate::strategy::Strategy;
use crate::window::WindowBounds;

/// Element type that lands in the `content` partition.
pub const CONTENT_TYPE: &str = "Text";
/// Element type excluded from both partitions' `ui` side.
pub const IMAGE_TYPE: &str = "Image";

/// Elements discovered in one window by one strategy.
///
/// Built once per discovery call and never mutated afterwards. `ui` and
/// `content` are disjoint: `content` holds `Text` elements, `ui` everything
/// else except images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UITree {
    pub window: String,
    pub window_class: String,
    pub strategy: Strategy,
    pub elements: Vec<UIElement>,
    pub ui: Vec<UIElement>,
    pub content: Vec<UIElement>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_bounds: Option<WindowBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_active: Option<bool>,
}

impl UITree {
    pub fn new(
        window: impl Into<String>,
        window_class: impl Into<String>,
        strategy: Strategy,
        elements: Vec<UIElement>,
    ) -> Self {
        let (content, rest): (Vec<_>, Vec<_>) = elements
            .iter()
            .cloned()
            .partition(|e| e.element_type == CONTENT_TYPE);
        let ui = rest
            .into_iter()
            .filter(|e| e.element_type != IMAGE_TYPE)
            .collect();

        Self {
            window: window.into(),
            window_class: window_class.into(),
            strategy,
            elements,
            ui,
            content,
            timestamp: chrono::Utc::now().timestamp_millis(),
            window_bounds: None,
            bridge_active: None,
        }
    }

    pub fn with_window_bounds(mut self, bounds: Option<WindowBounds>) -> Self {
        self.window_bounds = bounds;
        self
    }

    pub fn with_bridge_active(mut self, active: bool) -> Self {
        self.bridge_active = Some(active);
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
