//! Length-prefixed transport codec for JSON-RPC messages.
//!
//! Frames are a 4-byte big-endian payload length followed by the JSON
//! payload, giving reliable message delimitation over stream sockets.

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::protocol::Message;

/// Maximum frame size (4 MB). Search responses carry inline icon data, so
/// frames can be large, but anything beyond this is a protocol fault.
const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

const LENGTH_PREFIX_SIZE: usize = 4;

/// Codec for length-prefixed JSON-RPC messages
#[derive(Debug, Default)]
pub struct WireCodec {
    pending_length: Option<usize>,
}

impl WireCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for WireCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.pending_length.is_none() {
            if src.len() < LENGTH_PREFIX_SIZE {
                return Ok(None);
            }
            let len = src.get_u32() as usize;
            if len > MAX_FRAME_SIZE {
                return Err(CodecError::FrameTooLarge(len));
            }
            self.pending_length = Some(len);
        }

        let Some(length) = self.pending_length else {
            return Ok(None);
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let payload = src.split_to(length);
        self.pending_length = None;

        let json = std::str::from_utf8(&payload)?;
        Ok(Some(serde_json::from_str(json)?))
    }
}

impl Encoder<Message> for WireCodec {
    type Error = CodecError;

    // Frame size is checked against MAX_FRAME_SIZE (fits in u32)
    #[allow(clippy::cast_possible_truncation)]
    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&item)?;
        let bytes = json.as_bytes();

        if bytes.len() > MAX_FRAME_SIZE {
            return Err(CodecError::FrameTooLarge(bytes.len()));
        }

        dst.reserve(LENGTH_PREFIX_SIZE + bytes.len());
        dst.put_u32(bytes.len() as u32);
        dst.put_slice(bytes);
        Ok(())
    }
}

/// Errors that can occur during codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Frame too large: {0} bytes (max: {MAX_FRAME_SIZE})")]
    FrameTooLarge(usize),
}
