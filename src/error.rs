//! Public error surface for `fedicom`.
//!
//! [`FedicomError`] is what callers of [`crate::client`] see. It folds the
//! layered codec and session errors into one enum whose variants separate
//! transport trouble, corrupted input and protocol-logic mismatches.

use std::{fmt, io};

use thiserror::Error;

use crate::{
    codec::{CodecError, FieldError},
    session::{SessionError, State},
};

/// Transport step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportOp {
    /// Resolving the supplier host name.
    Resolve,
    /// Opening the TCP connection.
    Connect,
    /// Writing the order.
    Send,
    /// Reading the reply.
    Receive,
    /// Shutting the connection down.
    Close,
}

impl TransportOp {
    /// Label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Connect => "connect",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for TransportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Errors returned by the Fedicom client.
#[derive(Debug, Error)]
pub enum FedicomError {
    /// Connecting, sending or receiving failed or timed out.
    #[error("{operation} failed: {source}")]
    ConnectionFailed {
        /// Step that failed.
        operation: TransportOp,
        /// Underlying I/O error; timeouts use [`io::ErrorKind::TimedOut`].
        #[source]
        source: io::Error,
    },

    /// An outbound value did not fit its field.
    #[error("invalid field: {0}")]
    Field(#[from] FieldError),

    /// The reply could not be decoded.
    #[error("malformed reply: {0}")]
    Codec(#[from] CodecError),

    /// The supplier sent a frame the session did not expect.
    #[error("frame {code:?} out of sequence in state {state}")]
    OutOfSequence {
        /// Session state at the time.
        state: State,
        /// Type code of the offending frame.
        code: String,
    },

    /// The supplier rejected the requested quantities.
    #[error("insufficient quantity: {message:?}")]
    InsufficientQuantity {
        /// Free text sent by the supplier.
        message: String,
    },

    /// The reply was empty or ended before the session was closed.
    #[error("protocol error: {0}")]
    Protocol(#[source] SessionError),
}

impl FedicomError {
    /// Returns the error category as a string for logging and metrics.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => "connection",
            Self::Field(_) => "field",
            Self::Codec(_) => "malformed",
            Self::OutOfSequence { .. } => "sequence",
            Self::InsufficientQuantity { .. } => "insufficient_quantity",
            Self::Protocol(_) => "protocol",
        }
    }

    pub(crate) fn connection(operation: TransportOp, source: io::Error) -> Self {
        Self::ConnectionFailed { operation, source }
    }

    pub(crate) fn timed_out(operation: TransportOp, after: std::time::Duration) -> Self {
        Self::connection(
            operation,
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {}ms", after.as_millis()),
            ),
        )
    }
}

impl From<SessionError> for FedicomError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::OutOfSequence { state, code } => Self::OutOfSequence { state, code },
            SessionError::InsufficientQuantity { message } => Self::InsufficientQuantity { message },
            SessionError::Codec(CodecError::Io(source)) => {
                Self::connection(TransportOp::Receive, source)
            }
            SessionError::Codec(e) => Self::Codec(e),
            SessionError::Field(e) => Self::Field(e),
            e @ (SessionError::EmptyReply | SessionError::Incomplete { .. }) => Self::Protocol(e),
        }
    }
}

/// Result type used throughout the client API.
pub type Result<T, E = FedicomError> = std::result::Result<T, E>;
