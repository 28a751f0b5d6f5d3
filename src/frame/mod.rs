//! The Fedicom frame catalog.
//!
//! Every frame is a single line of printable ASCII: a four-digit type code
//! followed by fixed-width fields. [`FrameType`] identifies a line,
//! declares its layout and lists which frames may legally follow it.
//! [`Frame`] carries the decoded contents.

use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::codec::{CodecError, FieldSpec, field::{TYPE_CODE_WIDTH, layout_width}};

pub mod catalog;
pub mod reason;

pub use catalog::{
    CloseSession,
    CloseSessionAck,
    FinishOrder,
    IncidenceHeader,
    IncidenceOrderLine,
    InitSession,
    InitSessionAck,
    Order,
    OrderLine,
    QuantityRejection,
};
pub use reason::ReasonCode;

use catalog::layout;

/// Which way a frame travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the supplier to the client.
    Inbound,
    /// From the client to the supplier.
    Outbound,
}

impl Direction {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

/// Identifier of a frame kind, one per type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// `0101`: session opening and its acknowledgement.
    InitSession,
    /// `1010`: order header.
    Order,
    /// `1020`: requested article.
    OrderLine,
    /// `1050`: order trailer with totals.
    FinishOrder,
    /// `0199`: session close and its acknowledgement.
    CloseSession,
    /// `2010`: incidence report header.
    IncidenceHeader,
    /// `2015`: per-article incidence.
    IncidenceOrderLine,
    /// `9999`: the supplier rejected the requested quantities.
    QuantityRejection,
}

const BOTH: &[Direction] = &[Direction::Outbound, Direction::Inbound];
const OUTBOUND: &[Direction] = &[Direction::Outbound];
const INBOUND: &[Direction] = &[Direction::Inbound];

impl FrameType {
    /// Every frame type in the catalog.
    pub const ALL: [Self; 8] = [
        Self::InitSession,
        Self::Order,
        Self::OrderLine,
        Self::FinishOrder,
        Self::CloseSession,
        Self::IncidenceHeader,
        Self::IncidenceOrderLine,
        Self::QuantityRejection,
    ];

    /// The four-digit type code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InitSession => "0101",
            Self::Order => "1010",
            Self::OrderLine => "1020",
            Self::FinishOrder => "1050",
            Self::CloseSession => "0199",
            Self::IncidenceHeader => "2010",
            Self::IncidenceOrderLine => "2015",
            Self::QuantityRejection => "9999",
        }
    }

    /// Look up a frame type by its code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> { Self::ALL.into_iter().find(|t| t.code() == code) }

    /// Identify the frame type of a raw line from its leading code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownFrameType`] when the line is shorter than
    /// a type code or the code is not in the catalog.
    pub fn identify(line: &str) -> Result<Self, CodecError> {
        line.get(..TYPE_CODE_WIDTH)
            .and_then(Self::from_code)
            .ok_or_else(|| CodecError::UnknownFrameType {
                code: line.chars().take(TYPE_CODE_WIDTH).collect(),
            })
    }

    /// Directions in which the frame type may travel.
    #[must_use]
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::InitSession | Self::CloseSession => BOTH,
            Self::Order | Self::OrderLine | Self::FinishOrder => OUTBOUND,
            Self::IncidenceHeader | Self::IncidenceOrderLine | Self::QuantityRejection => INBOUND,
        }
    }

    /// Field layout following the type code.
    #[must_use]
    pub const fn layout(self) -> &'static [FieldSpec] {
        match self {
            Self::InitSession => layout::INIT_SESSION,
            Self::Order => layout::ORDER,
            Self::OrderLine => layout::ORDER_LINE,
            Self::FinishOrder => layout::FINISH_ORDER,
            Self::CloseSession => layout::CLOSE_SESSION,
            Self::IncidenceHeader => layout::INCIDENCE_HEADER,
            Self::IncidenceOrderLine => layout::INCIDENCE_ORDER_LINE,
            Self::QuantityRejection => layout::QUANTITY_REJECTION,
        }
    }

    /// Total line width including the type code, or `None` for
    /// [`FrameType::QuantityRejection`] whose free text has no fixed length.
    #[must_use]
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::QuantityRejection => None,
            _ => Some(TYPE_CODE_WIDTH + layout_width(self.layout())),
        }
    }

    /// Frame types that may legally follow this one when it travels in
    /// `direction`.
    ///
    /// A session close sent by the client is followed by the supplier's
    /// [`InitSessionAck`], which opens the reply, or by a quantity rejection
    /// sent in its place. An empty slice means the frame ends the exchange or
    /// cannot travel that way.
    #[must_use]
    pub const fn next(self, direction: Direction) -> &'static [Self] {
        match (direction, self) {
            (Direction::Outbound, Self::InitSession) => &[Self::Order],
            (Direction::Outbound, Self::Order | Self::OrderLine) => {
                &[Self::OrderLine, Self::FinishOrder]
            }
            (Direction::Outbound, Self::FinishOrder) => &[Self::CloseSession],
            (Direction::Outbound, Self::CloseSession) => {
                &[Self::InitSession, Self::QuantityRejection]
            }
            (Direction::Inbound, Self::InitSession) => &[
                Self::IncidenceHeader,
                Self::IncidenceOrderLine,
                Self::CloseSession,
                Self::QuantityRejection,
            ],
            (Direction::Inbound, Self::IncidenceHeader) => {
                &[Self::IncidenceOrderLine, Self::CloseSession]
            }
            (Direction::Inbound, Self::IncidenceOrderLine) => &[
                Self::IncidenceOrderLine,
                Self::IncidenceHeader,
                Self::CloseSession,
            ],
            _ => &[],
        }
    }

    /// Human-readable name without the code.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InitSession => "InitSession",
            Self::Order => "Order",
            Self::OrderLine => "OrderLine",
            Self::FinishOrder => "FinishOrder",
            Self::CloseSession => "CloseSession",
            Self::IncidenceHeader => "IncidenceHeader",
            Self::IncidenceOrderLine => "IncidenceOrderLine",
            Self::QuantityRejection => "QuantityRejection",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// A decoded or ready-to-send frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Session opening or its acknowledgement.
    InitSession(InitSession),
    /// Order header.
    Order(Order),
    /// Requested article.
    OrderLine(OrderLine),
    /// Order trailer.
    FinishOrder(FinishOrder),
    /// Session close or its acknowledgement.
    CloseSession(CloseSession),
    /// Incidence report header.
    IncidenceHeader(IncidenceHeader),
    /// Per-article incidence.
    IncidenceOrderLine(IncidenceOrderLine),
    /// Early quantity rejection.
    QuantityRejection(QuantityRejection),
}

impl Frame {
    /// Type of this frame.
    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::InitSession(_) => FrameType::InitSession,
            Self::Order(_) => FrameType::Order,
            Self::OrderLine(_) => FrameType::OrderLine,
            Self::FinishOrder(_) => FrameType::FinishOrder,
            Self::CloseSession(_) => FrameType::CloseSession,
            Self::IncidenceHeader(_) => FrameType::IncidenceHeader,
            Self::IncidenceOrderLine(_) => FrameType::IncidenceOrderLine,
            Self::QuantityRejection(_) => FrameType::QuantityRejection,
        }
    }

    /// Append the frame's text to `dst` without a line terminator.
    ///
    /// Field values are validated when the frame is built, so encoding is
    /// infallible.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Self::InitSession(f) => f.write(dst),
            Self::Order(f) => f.write(dst),
            Self::OrderLine(f) => f.write(dst),
            Self::FinishOrder(f) => f.write(dst),
            Self::CloseSession(_) => dst.extend_from_slice(FrameType::CloseSession.code().as_bytes()),
            Self::IncidenceHeader(f) => f.write(dst),
            Self::IncidenceOrderLine(f) => f.write(dst),
            Self::QuantityRejection(f) => f.write(dst),
        }
    }

    /// Encode into a standalone buffer without a line terminator.
    #[must_use]
    pub fn to_line(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.frame_type().width().unwrap_or(64));
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Decode one line, with its terminator already removed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidEncoding`] for non-printable input,
    /// [`CodecError::UnknownFrameType`] for an unrecognised code,
    /// [`CodecError::MalformedFrame`] when the length differs from the
    /// declared width and [`CodecError::MalformedField`] when a field fails
    /// its format.
    pub fn decode(line: &str) -> Result<Self, CodecError> {
        if !line.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
            return Err(CodecError::InvalidEncoding);
        }
        let frame_type = FrameType::identify(line)?;
        if let Some(expected) = frame_type.width()
            && line.len() != expected
        {
            return Err(CodecError::MalformedFrame {
                frame: frame_type,
                len: line.len(),
                expected,
            });
        }
        Ok(match frame_type {
            FrameType::InitSession => Self::InitSession(InitSession::read(line)?),
            FrameType::Order => Self::Order(Order::read(line)?),
            FrameType::OrderLine => Self::OrderLine(OrderLine::read(line)?),
            FrameType::FinishOrder => Self::FinishOrder(FinishOrder::read(line)?),
            FrameType::CloseSession => Self::CloseSession(CloseSession),
            FrameType::IncidenceHeader => Self::IncidenceHeader(IncidenceHeader::read(line)?),
            FrameType::IncidenceOrderLine => {
                Self::IncidenceOrderLine(IncidenceOrderLine::read(line)?)
            }
            FrameType::QuantityRejection => {
                Self::QuantityRejection(QuantityRejection::read(line))
            }
        })
    }
}

macro_rules! impl_from_frame {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Frame {
                fn from(value: $variant) -> Self { Self::$variant(value) }
            }
        )*
    };
}

impl_from_frame!(
    InitSession,
    Order,
    OrderLine,
    FinishOrder,
    CloseSession,
    IncidenceHeader,
    IncidenceOrderLine,
    QuantityRejection,
);

#[cfg(test)]
mod tests;
