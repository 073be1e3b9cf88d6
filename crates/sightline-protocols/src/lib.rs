//! # Sightline Protocols
//!
//! Data model and interface definitions shared by every Sightline crate.
//! Contains only types and traits - no implementations.
//!
//! ## Core Traits
//!
//! - [`DiscoverySource`] - One technique for pulling UI elements out of a window
//! - [`VisionModel`] - Locates targets in screenshots and verifies changes
//! - [`ScreenCapture`] - Produces screenshots
//! - [`Actuator`] - Performs physical clicks and keystrokes
//! - [`PointerSource`] - Reports the current pointer position
//! - [`FocusedWindowProvider`] - Reports the currently focused window

pub mod action;
pub mod browser;
pub mod collaborator;
pub mod element;
pub mod error;
pub mod screenshot;
pub mod source;
pub mod strategy;
pub mod tree;
pub mod window;

pub use action::{ActionKind, Located, SmartActOptions, SmartClickResult, Verification};
pub use browser::BrowserInfo;
pub use collaborator::{Actuator, FocusedWindowProvider, PointerSource, ScreenCapture, VisionModel};
pub use element::{RawElement, Rect, UIElement};
pub use error::{
    ActuatorError, BridgeError, CaptureError, ConnectionError, DiscoveryError, SafetyError,
    VisionError, WindowError,
};
pub use screenshot::Screenshot;
pub use source::{DiscoverySource, SourceKind};
pub use strategy::Strategy;
pub use tree::UITree;
pub use window::{WindowBounds, WindowTarget};
