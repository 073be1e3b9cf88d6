//! Screenshot payload exchanged with capture and vision collaborators.

/// An encoded screen capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// MIME type of `data`.
    pub media_type: String,
}

impl Screenshot {
    /// Wrap PNG bytes.
    pub fn png(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            media_type: "image/png".to_string(),
        }
    }
}
