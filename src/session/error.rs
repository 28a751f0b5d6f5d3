//! Protocol-logic failures raised while driving a session.

use thiserror::Error;

use super::State;
use crate::codec::{CodecError, FieldError};

/// Reasons a session is aborted.
///
/// Every variant is fatal: the session moves to [`State::Failed`] and no
/// reconciliation is produced.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A frame arrived, or was offered for sending, that the current state
    /// does not accept. Unknown type codes land here too.
    #[error("frame {code:?} is not acceptable in state {state}")]
    OutOfSequence {
        /// State the session was in.
        state: State,
        /// Type code of the refused frame.
        code: String,
    },

    /// The supplier answered with a quantity rejection.
    #[error("supplier rejected the requested quantities: {message:?}")]
    InsufficientQuantity {
        /// Free text carried by the rejection.
        message: String,
    },

    /// The reply held no complete line.
    #[error("supplier reply contained no complete frame")]
    EmptyReply,

    /// The reply ended before the supplier closed the session.
    #[error("supplier reply ended in state {state} without closing the session")]
    Incomplete {
        /// State reached when the reply ran out.
        state: State,
    },

    /// A frame could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An outbound frame could not be built.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl SessionError {
    /// Returns the error category as a string for logging and metrics.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::OutOfSequence { .. } => "sequence",
            Self::InsufficientQuantity { .. } => "insufficient_quantity",
            Self::EmptyReply | Self::Incomplete { .. } => "protocol",
            Self::Codec(CodecError::Io(_)) => "connection",
            Self::Codec(_) => "malformed",
            Self::Field(_) => "field",
        }
    }
}
