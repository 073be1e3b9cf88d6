//! Strategy detection.

mod detector;
mod game;

pub use detector::{HEURISTICS, StrategyDetector};
pub use game::GameSignatures;
