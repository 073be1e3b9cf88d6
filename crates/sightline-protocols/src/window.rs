//! Window identification passed to discovery.

use serde::{Deserialize, Serialize};

/// On-screen window rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The window a discovery request targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTarget {
    /// Window title.
    pub title: String,
    /// Platform window class (may be empty).
    pub window_class: String,
    /// Owning process name (may be empty).
    pub process_name: String,
    /// Owning process id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Window rectangle, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WindowBounds>,
}

impl WindowTarget {
    pub fn new(
        title: impl Into<String>,
        window_class: impl Into<String>,
        process_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            window_class: window_class.into(),
            process_name: process_name.into(),
            pid: None,
            bounds: None,
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_bounds(mut self, bounds: WindowBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}
