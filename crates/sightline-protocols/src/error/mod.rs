//! Error taxonomy.
//!
//! - connection-class: [`ConnectionError`] (debugger-protocol connect path)
//! - bridge-class: [`BridgeError`] (game bridge)
//! - safety-class: [`SafetyError`] (action gating, never retried)
//! - [`DiscoveryError`] wraps the above at the source boundary.

mod bridge;
mod collaborator;
mod connection;
mod discovery;
mod safety;

pub use bridge::BridgeError;
pub use collaborator::{ActuatorError, CaptureError, VisionError, WindowError};
pub use connection::ConnectionError;
pub use discovery::DiscoveryError;
pub use safety::SafetyError;
