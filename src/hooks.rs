//! Session observers.
//!
//! [`SessionObserver`] receives the events of one protocol exchange. The
//! session calls it synchronously as frames are sent and accepted, so an
//! observer sees events in wire order. [`TracingObserver`] is the default and
//! reports through `tracing` and the [`crate::metrics`] helpers.

use crate::{
    frame::{Direction, Frame},
    metrics,
    reconcile::IncidenceReport,
    session::{SessionError, State},
};

/// Callbacks invoked by [`crate::session::Session`].
///
/// All methods default to no-ops so implementors override only what they
/// need.
///
/// ```
/// use fedicom::{frame::Frame, hooks::SessionObserver, session::State};
///
/// #[derive(Default)]
/// struct Counter {
///     accepted: usize,
/// }
///
/// impl SessionObserver for Counter {
///     fn frame_accepted(&mut self, _state: State, _frame: &Frame) { self.accepted += 1; }
/// }
/// ```
pub trait SessionObserver {
    /// A frame was encoded for transmission.
    fn frame_sent(&mut self, _frame: &Frame) {}

    /// An inbound frame was accepted; `state` is the state it moved to.
    fn frame_accepted(&mut self, _state: State, _frame: &Frame) {}

    /// A frame was refused in `state`.
    fn frame_rejected(&mut self, _state: State, _error: &SessionError) {}

    /// The supplier closed the session normally.
    fn session_closed(&mut self, _report: &IncidenceReport) {}

    /// The session failed and will accept nothing further.
    fn session_failed(&mut self, _error: &SessionError) {}
}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn frame_sent(&mut self, frame: &Frame) { (**self).frame_sent(frame); }

    fn frame_accepted(&mut self, state: State, frame: &Frame) {
        (**self).frame_accepted(state, frame);
    }

    fn frame_rejected(&mut self, state: State, error: &SessionError) {
        (**self).frame_rejected(state, error);
    }

    fn session_closed(&mut self, report: &IncidenceReport) { (**self).session_closed(report); }

    fn session_failed(&mut self, error: &SessionError) { (**self).session_failed(error); }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Observer emitting `tracing` events and metrics.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn frame_sent(&mut self, frame: &Frame) {
        tracing::trace!(frame_type = %frame.frame_type(), "frame sent");
        metrics::inc_frames(Direction::Outbound);
    }

    fn frame_accepted(&mut self, state: State, frame: &Frame) {
        tracing::debug!(frame_type = %frame.frame_type(), %state, "frame accepted");
        metrics::inc_frames(Direction::Inbound);
    }

    fn frame_rejected(&mut self, state: State, error: &SessionError) {
        tracing::warn!(%state, error = %error, "frame rejected");
    }

    fn session_closed(&mut self, report: &IncidenceReport) {
        tracing::info!(incidences = report.len(), "session closed");
        metrics::inc_sessions_closed();
    }

    fn session_failed(&mut self, error: &SessionError) {
        tracing::warn!(error = %error, error_type = error.error_type(), "session failed");
        metrics::inc_session_failures(error.error_type());
    }
}
