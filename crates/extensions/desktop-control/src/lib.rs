//! Desktop collaborators for the action loop: system input and screen
//! capture.

mod actuator;
mod capture;

pub use actuator::{EnigoActuator, InputStep, MouseButton, plan};
pub use capture::{ScreenCapturer, capture_primary};
