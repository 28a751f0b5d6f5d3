//! Error types for the Fedicom codec layer.
//!
//! Two families are kept apart:
//!
//! - [`FieldError`]: raised while *building* a frame from typed values. A value that does not fit
//!   its fixed-width field is rejected here, so encoding itself never fails.
//! - [`CodecError`]: raised while *reading* frames from the wire. These describe structural damage
//!   (wrong length, non-numeric digits, unknown type codes) rather than protocol-logic mismatches,
//!   which live in [`crate::session::SessionError`].

use std::io;

use thiserror::Error;

use crate::frame::FrameType;

/// Construction-time validation failures for fixed-width fields.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Numeric value has more decimal digits than the field width allows.
    #[error("{field} value {value} does not fit in {width} digits")]
    Overflow {
        /// Name of the field being populated.
        field: &'static str,
        /// Rejected value.
        value: u64,
        /// Declared field width.
        width: usize,
    },

    /// Text value is longer than the field width.
    #[error("{field} is {len} characters long, maximum is {width}")]
    TooLong {
        /// Name of the field being populated.
        field: &'static str,
        /// Length of the rejected value.
        len: usize,
        /// Declared field width.
        width: usize,
    },

    /// Value contains characters that cannot be carried by the wire format.
    #[error("{field} contains characters outside printable ASCII")]
    InvalidCharacters {
        /// Name of the field being populated.
        field: &'static str,
    },

    /// A mandatory value was empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the field being populated.
        field: &'static str,
    },
}

/// Decode-time structural failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The first four characters do not name a known frame type.
    #[error("unknown frame type {code:?}")]
    UnknownFrameType {
        /// Leading characters of the offending line.
        code: String,
    },

    /// The line length does not match the declared width of its type.
    #[error("malformed {frame} frame: {len} characters, expected {expected}")]
    MalformedFrame {
        /// Frame type identified from the type code.
        frame: FrameType,
        /// Length of the received line.
        len: usize,
        /// Width declared by the catalog.
        expected: usize,
    },

    /// A field failed its format (for example, letters in a numeric field).
    #[error("malformed field {field} in {frame} frame: {value:?}")]
    MalformedField {
        /// Frame type being decoded.
        frame: FrameType,
        /// Name of the offending field.
        field: &'static str,
        /// Raw field contents.
        value: String,
    },

    /// The line is not printable ASCII.
    #[error("frame is not valid ASCII text")]
    InvalidEncoding,

    /// A line exceeded the configured maximum before its terminator arrived.
    #[error("line exceeds max length: {len} > {max}")]
    LineTooLong {
        /// Bytes buffered so far.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Transport failure surfaced through a `tokio_util` codec.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Returns the error category as a string for logging and metrics.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnknownFrameType { .. } => "unknown_type",
            Self::Io(_) => "io",
            Self::MalformedFrame { .. }
            | Self::MalformedField { .. }
            | Self::InvalidEncoding
            | Self::LineTooLong { .. } => "malformed",
        }
    }
}
