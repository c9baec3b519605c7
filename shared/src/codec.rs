//! Length-prefixed framing for envelopes on a byte stream
//!
//! ```text
//! [ u32 big-endian body length ][ body: protobuf Envelope ]
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;
use thiserror::Error;

use crate::Envelope;

/// Default upper bound for one frame body, medication images included
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

const LENGTH_PREFIX: usize = 4;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("frame body of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("malformed envelope: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("envelope encoding failed: {0}")]
    Encode(#[from] prost::EncodeError),
}

/// Encode an envelope into a single frame
pub fn encode(envelope: &Envelope) -> Result<Bytes, CodecError> {
    let len = envelope.encoded_len();
    check_len(len, MAX_FRAME_SIZE)?;

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX + len);
    frame.put_u32(len as u32);
    envelope.encode(&mut frame)?;
    Ok(frame.freeze())
}

fn check_len(len: usize, max: usize) -> Result<(), CodecError> {
    if len > max {
        return Err(CodecError::FrameTooLarge { len, max });
    }
    Ok(())
}

/// Where the decoder is within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Prefix,
    Body(usize),
}

/// Incremental frame decoder.
///
/// Bytes are appended with [`extend`](Self::extend) or read directly into
/// [`buffer_mut`](Self::buffer_mut). The length prefix is consumed as soon
/// as it is complete, so a large body is only measured once no matter how
/// many reads it takes to arrive.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: BytesMut,
    state: ReadState,
    max_frame: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_frame(MAX_FRAME_SIZE)
    }

    pub fn with_max_frame(max_frame: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            state: ReadState::Prefix,
            max_frame,
        }
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Receive buffer for `AsyncReadExt::read_buf`
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    /// Next complete envelope, or `Ok(None)` until more bytes arrive.
    ///
    /// An error leaves the stream unsynchronised; the caller should drop it.
    pub fn decode_next(&mut self) -> Result<Option<Envelope>, CodecError> {
        if self.state == ReadState::Prefix {
            if self.buffer.len() < LENGTH_PREFIX {
                return Ok(None);
            }
            let len = self.buffer.get_u32() as usize;
            check_len(len, self.max_frame)?;
            self.state = ReadState::Body(len);
        }

        let ReadState::Body(len) = self.state else {
            return Ok(None);
        };
        if self.buffer.len() < len {
            self.buffer.reserve(len - self.buffer.len());
            return Ok(None);
        }

        self.state = ReadState::Prefix;
        let body = self.buffer.split_to(len);
        Ok(Some(Envelope::decode(body)?))
    }

    /// Bytes received but not yet returned as an envelope, prefix included
    pub fn buffered(&self) -> usize {
        match self.state {
            ReadState::Prefix => self.buffer.len(),
            ReadState::Body(_) => self.buffer.len() + LENGTH_PREFIX,
        }
    }
}
