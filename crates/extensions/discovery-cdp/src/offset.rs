//! Page → screen coordinate conversion.

use serde_json::Value;
use sightline_protocols::{Rect, WindowBounds};
use tracing::{debug, warn};

use crate::cdp::PageSession;

/// Height of the browser's own chrome: tab strip, address bar, bookmarks.
pub const CHROME_OFFSET_EXPRESSION: &str = "window.outerHeight - window.innerHeight";

/// Used when the live probe fails.
pub fn fallback_chrome_offset() -> f64 {
    if cfg!(target_os = "macos") {
        79.0
    } else if cfg!(target_os = "windows") {
        87.0
    } else {
        85.0
    }
}

/// Measure the chrome height in the live page, or fall back.
pub async fn chrome_offset(session: &PageSession) -> f64 {
    match session.evaluate(CHROME_OFFSET_EXPRESSION).await {
        Ok(value) => match sanitize_offset(&value) {
            Some(offset) => {
                debug!(offset, "Measured browser chrome offset");
                offset
            }
            None => {
                warn!(value = %value, "Implausible chrome offset, using fallback");
                fallback_chrome_offset()
            }
        },
        Err(e) => {
            warn!(error = %e, "Chrome offset probe failed, using fallback");
            fallback_chrome_offset()
        }
    }
}

/// Accept only non-negative heights below a sane maximum.
pub fn sanitize_offset(value: &Value) -> Option<f64> {
    value.as_f64().filter(|h| (0.0..400.0).contains(h))
}

/// Translation from page coordinates to screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenOffset {
    pub x: f64,
    pub y: f64,
}

impl ScreenOffset {
    /// Window origin on both axes plus the chrome height on y.
    pub fn new(window: Option<WindowBounds>, chrome_offset: f64) -> Self {
        let (wx, wy) = window
            .map(|b| (f64::from(b.x), f64::from(b.y)))
            .unwrap_or((0.0, 0.0));
        Self {
            x: wx,
            y: wy + chrome_offset,
        }
    }

    pub fn apply(&self, rect: Rect) -> Rect {
        rect.translate(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_offset() {
        assert_eq!(sanitize_offset(&serde_json::json!(87)), Some(87.0));
        assert_eq!(sanitize_offset(&serde_json::json!(0)), Some(0.0));
        assert_eq!(sanitize_offset(&serde_json::json!(-5)), None);
        assert_eq!(sanitize_offset(&serde_json::json!(2000)), None);
        assert_eq!(sanitize_offset(&Value::Null), None);
    }

    #[test]
    fn test_screen_offset_applies_origin_and_chrome() {
        let bounds = WindowBounds {
            x: 100,
            y: 40,
            width: 1280,
            height: 800,
        };
        let offset = ScreenOffset::new(Some(bounds), 85.0);
        let rect = offset.apply(Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(rect, Rect::new(110.0, 145.0, 30.0, 40.0));
    }

    #[test]
    fn test_screen_offset_without_window() {
        let offset = ScreenOffset::new(None, 79.0);
        assert_eq!(offset, ScreenOffset { x: 0.0, y: 79.0 });
    }

    #[test]
    fn test_fallback_is_positive() {
        assert!(fallback_chrome_offset() > 0.0);
    }
}
