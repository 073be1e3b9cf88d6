//! External collaborator traits.
//!
//! Screen capture, the vision model, physical input and window focus are
//! provided from outside the engine; the engine only depends on these traits.

use async_trait::async_trait;

use crate::action::{ActionKind, Located, Verification};
use crate::error::{ActuatorError, CaptureError, VisionError, WindowError};
use crate::screenshot::Screenshot;
use crate::window::WindowTarget;

/// Captures the screen.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self) -> Result<Screenshot, CaptureError>;
}

/// Locates targets in screenshots and judges before/after pairs.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Find the described target. `Ok(None)` when it is not visible.
    async fn locate(
        &self,
        screenshot: &Screenshot,
        description: &str,
    ) -> Result<Option<Located>, VisionError>;

    /// Decide whether the expected change happened between two captures.
    async fn verify(
        &self,
        before: &Screenshot,
        after: &Screenshot,
        expectation: &str,
    ) -> Result<Verification, VisionError>;
}

/// Performs physical input.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn perform(&self, action: &ActionKind, x: i32, y: i32) -> Result<(), ActuatorError>;
}

/// Reports where the pointer currently is.
#[async_trait]
pub trait PointerSource: Send + Sync {
    async fn position(&self) -> Result<(i32, i32), ActuatorError>;
}

/// Reports the focused window, if any.
#[async_trait]
pub trait FocusedWindowProvider: Send + Sync {
    async fn focused_window(&self) -> Result<Option<WindowTarget>, WindowError>;
}
