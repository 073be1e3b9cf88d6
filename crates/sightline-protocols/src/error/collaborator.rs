//! Errors reported by external collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    RequestFailed(String),

    #[error("Target not found: {0}")]
    NotFound(String),

    #[error("Unparseable vision response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("No monitor found")]
    NoMonitor,
}

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Input failed: {0}")]
    Failed(String),

    #[error("Input backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Window detection not supported on this platform")]
    PlatformNotSupported,

    #[error("Window query failed: {0}")]
    QueryFailed(String),
}
