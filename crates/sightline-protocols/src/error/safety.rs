//! Safety-class errors. These must reach the caller unchanged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SafetyError {
    /// The operator moved the pointer. Wait for an explicit reset.
    #[error("Interrupted by user: pointer moved {distance:.1}px (threshold {threshold:.1}px)")]
    UserInterrupt { distance: f64, threshold: f64 },

    #[error("Restricted action refused: '{description}' matches '{pattern}'")]
    RestrictedAction { description: String, pattern: String },
}
