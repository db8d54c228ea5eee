//! IRC message codec for tokio.
//!
//! Wraps [`LineCodec`] and parses lines into [`Message`] types.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use tracing::debug;

use crate::error;
use crate::line::LineCodec;
use crate::message::Message;

/// Tokio codec for encoding/decoding IRC messages.
///
/// Blank and unparseable lines are skipped rather than reported, so one bad
/// line never ends the stream.
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a new codec with the standard line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        while let Some(line) = self.inner.decode(src)? {
            if let Some(msg) = parse_or_skip(&line) {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        while let Some(line) = self.inner.decode_eof(src)? {
            if let Some(msg) = parse_or_skip(&line) {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }
}

fn parse_or_skip(line: &str) -> Option<Message> {
    if line.trim().is_empty() {
        return None;
    }
    match Message::parse_line(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            debug!(error = %e, line = %line, "Skipping malformed line");
            None
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        self.inner.encode(msg.to_wire(), dst)
    }
}
