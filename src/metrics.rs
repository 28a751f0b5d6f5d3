//! Metric helpers for `fedicom`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. With the
//! `metrics` feature disabled the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::frame::Direction;

/// Name of the counter tracking accepted frames.
pub const FRAMES_PROCESSED: &str = "fedicom_frames_processed_total";
/// Name of the counter tracking sessions closed normally.
pub const SESSIONS_CLOSED: &str = "fedicom_sessions_closed_total";
/// Name of the counter tracking failed sessions.
pub const SESSION_FAILURES: &str = "fedicom_session_failures_total";

/// Record a frame sent or accepted in the given direction.
pub fn inc_frames(direction: Direction) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_PROCESSED, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a session that reached its close acknowledgement.
pub fn inc_sessions_closed() {
    #[cfg(feature = "metrics")]
    counter!(SESSIONS_CLOSED).increment(1);
}

/// Record a failed session, labelled by error category.
pub fn inc_session_failures(error_type: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(SESSION_FAILURES, "error_type" => error_type).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = error_type;
}
