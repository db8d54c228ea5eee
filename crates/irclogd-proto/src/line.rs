//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated lines, applying low-level quoting on
//! the way out and reversing it on the way in. Quoting can be switched off to
//! read plain text feeds with the same line discipline.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error;
use crate::quote::{quote, unquote};

/// Default maximum line length in bytes (IRC standard).
pub const DEFAULT_MAX_LEN: usize = 512;

/// Line-based codec that handles newline-terminated messages.
///
/// Accepts both CRLF and bare LF. Lines longer than `max_len` are discarded
/// and decoding resumes at the next line. At end of stream an unterminated
/// final line is still returned.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Set while skipping the rest of an overlong line
    discarding: bool,
    /// Apply low-level quoting
    quoting: bool,
}

impl LineCodec {
    /// Create a new codec with the standard 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
            quoting: true,
        }
    }

    /// Pass text through unchanged instead of quoting it.
    pub fn without_quoting(mut self) -> Self {
        self.quoting = false;
        self
    }

    fn finish(&self, line: &[u8]) -> String {
        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches('\n').trim_end_matches('\r');
        if self.quoting {
            unquote(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_len {
                    if !self.discarding {
                        warn!(limit = self.max_len, "Discarding overlong input line");
                    }
                    src.clear();
                    self.discarding = true;
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding || line.len() > self.max_len {
                if !self.discarding {
                    warn!(actual = line.len(), limit = self.max_len, "Discarding overlong input line");
                }
                self.discarding = false;
                continue;
            }

            return Ok(Some(self.finish(&line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) || src.is_empty() {
            src.clear();
            return Ok(None);
        }
        let line = src.split();
        Ok(Some(self.finish(&line)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        let wire = if self.quoting { quote(&line) } else { line };
        dst.reserve(wire.len() + 2);
        dst.put_slice(wire.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
