//! Tracing span helpers for client operations.
//!
//! Centralising span creation keeps field names consistent across the
//! transport methods.

use tracing::{Span, field};

use super::PartyProfile;

/// Create a span for the `connect` operation.
pub(crate) fn connect_span(profile: &PartyProfile) -> Span {
    tracing::info_span!(
        "client.connect",
        peer.host = profile.host(),
        peer.port = profile.port(),
        party = profile.party().unwrap_or("-"),
    )
}

/// Create a span for the `send` operation.
pub(crate) fn send_span(frame_bytes: usize) -> Span {
    tracing::debug_span!("client.send", frame.bytes = frame_bytes)
}

/// Create a span for the `receive` operation.
///
/// The `frame.bytes` field is recorded once the reply is buffered.
pub(crate) fn receive_span() -> Span { tracing::debug_span!("client.receive", frame.bytes = field::Empty) }
