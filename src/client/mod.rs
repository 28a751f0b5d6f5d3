//! Client runtime for Fedicom suppliers.
//!
//! [`FedicomClient`] moves bytes between a [`crate::session::Session`] and
//! the supplier's order-entry server. Each transport step honours the
//! profile timeout, and every transport failure surfaces as
//! [`crate::error::FedicomError::ConnectionFailed`] naming the step. Replies
//! are read line by line through [`crate::codec::LineCodec`].

mod config;
mod runtime;
mod tracing_helpers;

pub use config::{DEFAULT_MAX_REPLY_LENGTH, DEFAULT_TIMEOUT, PartyProfile, SocketOptions};
pub use runtime::{ClientStream, FedicomClient, submit_order};
