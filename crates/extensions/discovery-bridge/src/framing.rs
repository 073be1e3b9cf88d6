//! `u32` big-endian length prefix followed by that many bytes of JSON.

use std::io;

use bytes::Bytes;
use futures::StreamExt;
use sightline_protocols::BridgeError;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LengthDelimitedCodec, LengthDelimitedCodecError};

/// Largest payload accepted from a bridge.
pub const MAX_FRAME_LEN: usize = 10 * 1024 * 1024;

/// Codec for bridge frames. Oversized lengths fail as soon as the prefix is
/// read, before any payload is buffered.
pub fn codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .big_endian()
        .length_field_length(4)
        .max_frame_length(MAX_FRAME_LEN)
        .new_codec()
}

/// Read exactly one frame, however the bytes are chunked.
pub async fn read_frame<R>(reader: R) -> Result<Bytes, BridgeError>
where
    R: AsyncRead + Unpin,
{
    let mut frames = FramedRead::new(reader, codec());
    match frames.next().await {
        Some(Ok(frame)) => Ok(frame.freeze()),
        Some(Err(e)) => Err(classify(e)),
        None => Err(BridgeError::ProtocolError(
            "connection closed before a frame arrived".to_string(),
        )),
    }
}

fn classify(error: io::Error) -> BridgeError {
    let oversized = error
        .get_ref()
        .is_some_and(|inner| inner.is::<LengthDelimitedCodecError>());
    if oversized {
        return BridgeError::ProtocolError(format!("frame exceeds {MAX_FRAME_LEN} bytes"));
    }
    match error.kind() {
        // FramedRead reports a partial frame at EOF as `Other`.
        io::ErrorKind::Other | io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => {
            BridgeError::ProtocolError(format!("truncated frame: {error}"))
        }
        _ => BridgeError::Io(error.to_string()),
    }
}

/// Prefix `payload` with its length. Used by test bridges and tooling.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}
