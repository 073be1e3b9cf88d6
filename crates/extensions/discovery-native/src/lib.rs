//! Native discovery for Sightline: external helper programs and
//! focused-window detection.

mod helper;
pub mod window;

pub use helper::{HelperSource, parse_helper_output, substitute};
pub use window::SystemWindowProvider;
