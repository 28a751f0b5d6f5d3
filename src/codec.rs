//! Text framing codecs for the Fedicom wire format.
//!
//! A Fedicom exchange is a sequence of ASCII lines separated by CRLF. Each
//! line starts with a four-digit type code and is followed by fixed-width
//! fields laid out by the [`crate::frame`] catalog.
//!
//! # Error Handling
//!
//! Building a frame from values that do not fit their fields fails with
//! [`FieldError`]; encoding a built frame never fails. Reading damaged input
//! fails with [`CodecError`], which distinguishes unknown type codes from
//! structural damage (see [`CodecError::error_type`]).

pub mod error;
pub mod field;
pub mod line;

pub use error::{CodecError, FieldError};
pub use field::{ArticleCode, FieldKind, FieldSpec};
pub use line::{LineCodec, ReplyLines, is_terminal_line, split_reply};

/// Line terminator used between frames.
pub const CRLF: &[u8] = b"\r\n";

/// Minimum line length in bytes.
///
/// Lengths passed to [`LineCodec::new`] are clamped to at least this value so
/// every catalog frame fits.
pub const MIN_LINE_LENGTH: usize = 64;

/// Maximum line length in bytes (64 KiB).
///
/// Lengths passed to [`LineCodec::new`] are clamped to at most this value to
/// prevent unbounded buffering of a runaway line.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

pub(crate) fn clamp_line_length(value: usize) -> usize {
    value.clamp(MIN_LINE_LENGTH, MAX_LINE_LENGTH)
}

#[cfg(test)]
mod tests;
