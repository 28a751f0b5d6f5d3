//! Session states.

use std::fmt;

/// Position of a [`super::Session`] within the exchange.
///
/// Sends are pipelined: the whole order is encoded before any reply is
/// read, so the outbound states precede the inbound ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Nothing sent yet.
    #[default]
    Start,
    /// Session opened; order frames are being sent.
    SendingOrder,
    /// Close sent; waiting for the supplier's session acknowledgement.
    AwaitingInitAck,
    /// Acknowledgement received; waiting for incidences or close.
    AwaitingReply,
    /// An incidence header was accepted.
    ProcessingIncidenceHeader,
    /// An incidence line was accepted.
    ProcessingIncidenceLine,
    /// The supplier closed the session.
    Closed,
    /// The exchange was aborted.
    Failed,
}

impl State {
    /// `true` once the session accepts nothing further.
    #[must_use]
    pub const fn is_terminal(self) -> bool { matches!(self, Self::Closed | Self::Failed) }

    /// `true` while outbound frames may still be sent.
    #[must_use]
    pub const fn is_sending(self) -> bool { matches!(self, Self::Start | Self::SendingOrder) }

    /// Name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SendingOrder => "sending_order",
            Self::AwaitingInitAck => "awaiting_init_ack",
            Self::AwaitingReply => "awaiting_reply",
            Self::ProcessingIncidenceHeader => "processing_incidence_header",
            Self::ProcessingIncidenceLine => "processing_incidence_line",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
