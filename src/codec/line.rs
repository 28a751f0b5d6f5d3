//! CRLF line framing.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use super::{CRLF, CodecError, clamp_line_length};
use crate::frame::FrameType;

const DEFAULT_LINE_LENGTH: usize = 512;

/// `tokio_util` codec splitting a byte stream into CRLF-terminated lines.
///
/// The decoder yields raw lines without their terminator so callers can
/// inspect the type code before decoding any fields.
#[derive(Clone, Debug)]
pub struct LineCodec {
    max_line_length: usize,
    scanned: usize,
}

impl LineCodec {
    /// Construct a codec accepting lines up to `max_line_length` bytes.
    #[must_use]
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length: clamp_line_length(max_line_length),
            scanned: 0,
        }
    }

    /// Return the maximum line length accepted by this codec.
    #[must_use]
    pub fn max_line_length(&self) -> usize { self.max_line_length }
}

impl Default for LineCodec {
    fn default() -> Self { Self::new(DEFAULT_LINE_LENGTH) }
}

fn find_crlf(buf: &[u8]) -> Option<usize> { buf.windows(CRLF.len()).position(|w| w == CRLF) }

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Resume one byte early in case the previous read ended between CR and LF.
        let start = self.scanned.saturating_sub(1).min(src.len());
        if let Some(offset) = find_crlf(&src[start..]) {
            let end = start + offset;
            self.scanned = 0;
            if end > self.max_line_length {
                return Err(CodecError::LineTooLong {
                    len: end,
                    max: self.max_line_length,
                });
            }
            let mut line = src.split_to(end + CRLF.len());
            line.truncate(end);
            return Ok(Some(line.freeze()));
        }
        if src.len() > self.max_line_length {
            return Err(CodecError::LineTooLong {
                len: src.len(),
                max: self.max_line_length,
            });
        }
        self.scanned = src.len();
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if !src.is_empty() {
            tracing::warn!(bytes = src.len(), "discarding unterminated trailing segment");
            src.clear();
        }
        self.scanned = 0;
        Ok(None)
    }
}

/// A reply split into complete lines plus whatever followed the last CRLF.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyLines {
    lines: Vec<Bytes>,
    trailing: Bytes,
}

impl ReplyLines {
    /// Complete lines in arrival order, terminators removed.
    #[must_use]
    pub fn lines(&self) -> &[Bytes] { &self.lines }

    /// Bytes after the final CRLF. Never processed as a frame.
    #[must_use]
    pub fn trailing(&self) -> &Bytes { &self.trailing }

    /// Number of complete lines.
    #[must_use]
    pub fn len(&self) -> usize { self.lines.len() }

    /// `true` when the reply held no complete line.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

impl IntoIterator for ReplyLines {
    type Item = Bytes;
    type IntoIter = std::vec::IntoIter<Bytes>;

    fn into_iter(self) -> Self::IntoIter { self.lines.into_iter() }
}

/// Split a buffered reply on CRLF.
///
/// The segment after the last CRLF is excluded from [`ReplyLines::lines`].
/// When it is non-empty a warning is logged and the bytes are kept in
/// [`ReplyLines::trailing`] for inspection.
#[must_use]
pub fn split_reply(reply: &Bytes) -> ReplyLines {
    let mut lines = Vec::new();
    let mut start = 0;
    while let Some(offset) = find_crlf(&reply[start..]) {
        lines.push(reply.slice(start..start + offset));
        start += offset + CRLF.len();
    }
    let trailing = reply.slice(start..);
    if !trailing.is_empty() {
        tracing::warn!(
            bytes = trailing.len(),
            lines = lines.len(),
            "ignoring unterminated trailing segment"
        );
    }
    ReplyLines { lines, trailing }
}

/// `true` when `line` ends a supplier reply: a session close or a quantity
/// rejection.
#[must_use]
pub fn is_terminal_line(line: &[u8]) -> bool {
    [FrameType::CloseSession, FrameType::QuantityRejection]
        .iter()
        .any(|t| line.starts_with(t.code().as_bytes()))
}
