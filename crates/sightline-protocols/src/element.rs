//! Normalized UI element.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Shift the rectangle by the given offsets.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Build a rectangle from a CDP quad (8 numbers, clockwise from top-left).
    pub fn from_quad(quad: &[f64]) -> Option<Self> {
        if quad.len() < 8 {
            return None;
        }
        let xs = [quad[0], quad[2], quad[4], quad[6]];
        let ys = [quad[1], quad[3], quad[5], quad[7]];
        let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// A discovered, interactable or readable element in screen coordinates.
///
/// Produced fresh by every discovery call. Width and height are always
/// positive; use [`UIElement::from_parts`] or [`RawElement::normalize`] to
/// enforce that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UIElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<String>,
}

impl UIElement {
    /// Build an element from screen-space bounds, rejecting zero-size geometry.
    pub fn from_parts(
        element_type: impl Into<String>,
        name: impl Into<String>,
        bounds: Rect,
        is_enabled: bool,
    ) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        // Sub-pixel elements still occupy one pixel.
        let width = bounds.width.round().max(1.0) as i32;
        let height = bounds.height.round().max(1.0) as i32;
        Some(Self {
            element_type: element_type.into(),
            name: name.into(),
            description: None,
            value: None,
            x: bounds.x.round() as i32,
            y: bounds.y.round() as i32,
            width,
            height,
            is_enabled,
            automation_id: None,
        })
    }

    /// Attach a description, ignoring empty strings.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    /// Attach a value, ignoring empty strings.
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = non_empty(value);
        self
    }

    /// Attach an automation id, ignoring empty strings.
    pub fn with_automation_id(mut self, automation_id: Option<String>) -> Self {
        self.automation_id = non_empty(automation_id);
        self
    }

    /// Center point of the element.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lenient element shape emitted by external discovery helpers.
///
/// Every field is optional; coordinates may be fractional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub automation_id: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl RawElement {
    /// Convert to a [`UIElement`], discarding zero-size geometry.
    pub fn normalize(self) -> Option<UIElement> {
        let bounds = Rect::new(self.x, self.y, self.width, self.height);
        let element_type = self
            .element_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Control".to_string());
        UIElement::from_parts(element_type, self.name.unwrap_or_default(), bounds, self.is_enabled)
            .map(|e| {
                e.with_description(self.description)
                    .with_value(self.value)
                    .with_automation_id(self.automation_id)
            })
    }
}

#[cfg(test)]
#[path = "element_tests.rs"]
mod tests;
