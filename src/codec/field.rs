//! Fixed-width field layouts and their text encodings.
//!
//! Each frame type declares its fields as a static slice of [`FieldSpec`].
//! [`FieldWriter`] and [`FieldReader`] walk those declarations so that the
//! width used on the wire is always the width the catalog advertises.

use std::{fmt, str::FromStr};

use bytes::{BufMut, BytesMut};
use chrono::{Datelike, NaiveDateTime};

use super::error::{CodecError, FieldError};
use crate::frame::{FrameType, ReasonCode};

/// Width of the leading type code shared by every frame.
pub const TYPE_CODE_WIDTH: usize = 4;

/// Width of article and supplier codes on the wire.
pub const ARTICLE_CODE_WIDTH: usize = 13;

/// Width of a `YYYYMMDDhhmmss` timestamp.
pub const TIMESTAMP_WIDTH: usize = 14;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// How a field's characters are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-justified, space-padded text.
    Text,
    /// Right-justified, zero-padded unsigned integer.
    Numeric,
    /// Zero-padded integer with an implied number of decimal places.
    Decimal {
        /// Digits after the implied decimal point.
        places: u8,
    },
    /// Right-justified, zero-padded article or supplier code.
    Code,
    /// Two-digit incidence reason.
    Reason,
    /// Local date and time as `YYYYMMDDhhmmss`.
    Timestamp,
}

/// Declaration of one positional field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    width: usize,
    kind: FieldKind,
}

impl FieldSpec {
    /// Declare a text field.
    #[must_use]
    pub const fn text(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            kind: FieldKind::Text,
        }
    }

    /// Declare an unsigned integer field.
    #[must_use]
    pub const fn numeric(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            kind: FieldKind::Numeric,
        }
    }

    /// Declare a fixed-point field with `places` implied decimals.
    #[must_use]
    pub const fn decimal(name: &'static str, width: usize, places: u8) -> Self {
        Self {
            name,
            width,
            kind: FieldKind::Decimal { places },
        }
    }

    /// Declare a 13-character article code field.
    #[must_use]
    pub const fn code(name: &'static str) -> Self {
        Self {
            name,
            width: ARTICLE_CODE_WIDTH,
            kind: FieldKind::Code,
        }
    }

    /// Declare a two-digit reason code field.
    #[must_use]
    pub const fn reason(name: &'static str) -> Self {
        Self {
            name,
            width: 2,
            kind: FieldKind::Reason,
        }
    }

    /// Declare a 14-character timestamp field.
    #[must_use]
    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            width: TIMESTAMP_WIDTH,
            kind: FieldKind::Timestamp,
        }
    }

    /// Field name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str { self.name }

    /// Width in characters.
    #[must_use]
    pub const fn width(&self) -> usize { self.width }

    /// Encoding of the field contents.
    #[must_use]
    pub const fn kind(&self) -> FieldKind { self.kind }

    /// Validate that `value` fits this numeric field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when `value` has more digits than the
    /// field width.
    pub fn check_numeric(&self, value: u64) -> Result<u64, FieldError> {
        let fits = u32::try_from(self.width)
            .ok()
            .and_then(|width| 10_u64.checked_pow(width))
            .is_none_or(|limit| value < limit);
        if fits {
            Ok(value)
        } else {
            Err(FieldError::Overflow {
                field: self.name,
                value,
                width: self.width,
            })
        }
    }

    /// Validate a text value against this field.
    ///
    /// Trailing spaces are dropped: the wire pads with spaces, so they would
    /// not survive a decode.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidCharacters`] for anything outside printable
    /// ASCII and [`FieldError::TooLong`] when the value exceeds the width.
    pub fn check_text(&self, value: &str) -> Result<String, FieldError> {
        let value = value.trim_end_matches(' ');
        if !value.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
            return Err(FieldError::InvalidCharacters { field: self.name });
        }
        if value.len() > self.width {
            return Err(FieldError::TooLong {
                field: self.name,
                len: value.len(),
                width: self.width,
            });
        }
        Ok(value.to_owned())
    }
}

/// Total width of a layout, excluding the type code.
#[must_use]
pub const fn layout_width(fields: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut index = 0;
    while index < fields.len() {
        total += fields[index].width;
        index += 1;
    }
    total
}

/// Article or supplier code, normalised to 13 characters.
///
/// Codes are right-justified and zero-padded so that `"8470001234"` and
/// `"0008470001234"` compare equal; the normalised form is what the wire
/// carries and what incidence maps are keyed by.
///
/// # Examples
///
/// ```
/// use fedicom::codec::ArticleCode;
///
/// let code: ArticleCode = "8470001234".parse().expect("valid code");
/// assert_eq!(code.as_str(), "0008470001234");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleCode(String);

impl ArticleCode {
    /// Normalise and validate a code.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the trimmed code is empty, longer than 13
    /// characters, or contains whitespace or non-ASCII characters.
    pub fn new(code: &str) -> Result<Self, FieldError> {
        const FIELD: &str = "article_code";
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Empty { field: FIELD });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(FieldError::InvalidCharacters { field: FIELD });
        }
        if trimmed.len() > ARTICLE_CODE_WIDTH {
            return Err(FieldError::TooLong {
                field: FIELD,
                len: trimmed.len(),
                width: ARTICLE_CODE_WIDTH,
            });
        }
        Ok(Self(format!("{trimmed:0>ARTICLE_CODE_WIDTH$}")))
    }

    /// The 13-character wire form.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ArticleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for ArticleCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

/// Validate a timestamp for the 14-character field.
///
/// # Errors
///
/// Returns [`FieldError::Overflow`] when the year does not fit four digits.
pub fn check_timestamp(spec: &FieldSpec, value: NaiveDateTime) -> Result<NaiveDateTime, FieldError> {
    match u64::try_from(value.year()) {
        Ok(year) if (1..=9999).contains(&year) => Ok(value),
        Ok(year) => Err(FieldError::Overflow {
            field: spec.name(),
            value: year,
            width: 4,
        }),
        Err(_) => Err(FieldError::Overflow {
            field: spec.name(),
            value: 0,
            width: 4,
        }),
    }
}

/// Appends fields to an output buffer.
pub(crate) struct FieldWriter<'a> {
    dst: &'a mut BytesMut,
}

impl<'a> FieldWriter<'a> {
    pub(crate) fn new(dst: &'a mut BytesMut, frame: FrameType) -> Self {
        dst.extend_from_slice(frame.code().as_bytes());
        Self { dst }
    }

    pub(crate) fn text(&mut self, spec: &FieldSpec, value: &str) {
        debug_assert!(value.len() <= spec.width(), "{} overflows", spec.name());
        self.dst.extend_from_slice(value.as_bytes());
        self.pad(b' ', spec.width().saturating_sub(value.len()));
    }

    pub(crate) fn numeric(&mut self, spec: &FieldSpec, value: u64) {
        let digits = value.to_string();
        debug_assert!(digits.len() <= spec.width(), "{} overflows", spec.name());
        self.pad(b'0', spec.width().saturating_sub(digits.len()));
        self.dst.extend_from_slice(digits.as_bytes());
    }

    pub(crate) fn code(&mut self, spec: &FieldSpec, value: &ArticleCode) {
        self.text(spec, value.as_str());
    }

    pub(crate) fn reason(&mut self, spec: &FieldSpec, value: ReasonCode) {
        self.numeric(spec, u64::from(value.value()));
    }

    pub(crate) fn timestamp(&mut self, spec: &FieldSpec, value: &NaiveDateTime) {
        let formatted = value.format(TIMESTAMP_FORMAT).to_string();
        self.text(spec, &formatted);
    }

    /// Append free text with no width constraint.
    pub(crate) fn raw(&mut self, value: &str) { self.dst.extend_from_slice(value.as_bytes()); }

    fn pad(&mut self, byte: u8, count: usize) { self.dst.put_bytes(byte, count); }
}

/// Reads fields sequentially from a decoded line.
pub(crate) struct FieldReader<'a> {
    frame: FrameType,
    line: &'a str,
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(frame: FrameType, line: &'a str) -> Self {
        Self {
            frame,
            line,
            offset: TYPE_CODE_WIDTH,
        }
    }

    fn take(&mut self, spec: &FieldSpec) -> Result<&'a str, CodecError> {
        let end = self.offset + spec.width();
        let raw = self
            .line
            .get(self.offset..end)
            .ok_or_else(|| CodecError::MalformedFrame {
                frame: self.frame,
                len: self.line.len(),
                expected: end,
            })?;
        self.offset = end;
        Ok(raw)
    }

    fn malformed(&self, spec: &FieldSpec, raw: &str) -> CodecError {
        CodecError::MalformedField {
            frame: self.frame,
            field: spec.name(),
            value: raw.to_owned(),
        }
    }

    pub(crate) fn text(&mut self, spec: &FieldSpec) -> Result<String, CodecError> {
        Ok(self.take(spec)?.trim_end().to_owned())
    }

    pub(crate) fn numeric(&mut self, spec: &FieldSpec) -> Result<u64, CodecError> {
        let raw = self.take(spec)?;
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.malformed(spec, raw));
        }
        raw.parse::<u64>().map_err(|_| self.malformed(spec, raw))
    }

    pub(crate) fn numeric_u32(&mut self, spec: &FieldSpec) -> Result<u32, CodecError> {
        let value = self.numeric(spec)?;
        u32::try_from(value).map_err(|_| CodecError::MalformedField {
            frame: self.frame,
            field: spec.name(),
            value: value.to_string(),
        })
    }

    pub(crate) fn code(&mut self, spec: &FieldSpec) -> Result<ArticleCode, CodecError> {
        let raw = self.take(spec)?;
        ArticleCode::new(raw).map_err(|_| self.malformed(spec, raw))
    }

    pub(crate) fn reason(&mut self, spec: &FieldSpec) -> Result<ReasonCode, CodecError> {
        let raw = self.take(spec)?;
        raw.parse::<ReasonCode>()
            .map_err(|_| self.malformed(spec, raw))
    }

    pub(crate) fn timestamp(&mut self, spec: &FieldSpec) -> Result<NaiveDateTime, CodecError> {
        let raw = self.take(spec)?;
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| self.malformed(spec, raw))
    }

    /// Remaining characters after the fields read so far.
    pub(crate) fn rest(&self) -> &'a str { self.line.get(self.offset..).unwrap_or_default() }
}
