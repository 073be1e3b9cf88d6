//! Verified actions and their safety gates.

mod guard;
mod kill_switch;
mod smart_act;
mod vision;

pub use guard::ActionGuard;
pub use kill_switch::KillSwitch;
pub use smart_act::ActionLoop;
pub use vision::{ImageAnalyzer, PromptVision, parse_coordinates, parse_verification};
