//! Screen capture.

use std::io::Cursor;

use async_trait::async_trait;
use screenshots::Screen;
use screenshots::image::ImageOutputFormat;
use sightline_protocols::{CaptureError, ScreenCapture, Screenshot};

fn primary_screen() -> Result<Screen, CaptureError> {
    let screens = Screen::all().map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
    let mut fallback = None;
    for screen in screens {
        if screen.display_info.is_primary {
            return Ok(screen);
        }
        fallback.get_or_insert(screen);
    }
    fallback.ok_or(CaptureError::NoMonitor)
}

/// Capture the primary monitor as PNG.
pub fn capture_primary() -> Result<Screenshot, CaptureError> {
    let image = primary_screen()?
        .capture()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
    let (width, height) = (image.width(), image.height());

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    Ok(Screenshot::png(buffer.into_inner(), width, height))
}

/// [`ScreenCapture`] for the primary monitor.
#[derive(Debug, Default, Clone)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScreenCapture for ScreenCapturer {
    async fn capture(&self) -> Result<Screenshot, CaptureError> {
        tokio::task::spawn_blocking(capture_primary)
            .await
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?
    }
}
