#![doc(html_root_url = "https://docs.rs/fedicom/latest")]
//! Public API for the `fedicom` library.
//!
//! This crate implements the client side of the Fedicom fixed-width purchase
//! order protocol: the frame codec and message catalogue, a session state
//! machine validating the supplier's reply, a TCP transport and the
//! reconciliation of reported incidences against the submitted order.

pub mod client;
pub mod codec;
pub mod error;
pub mod frame;
pub mod hooks;
pub mod metrics;
pub mod order;
pub mod reconcile;
pub mod session;

pub use client::{FedicomClient, PartyProfile, SocketOptions, submit_order};
pub use codec::{ArticleCode, CodecError, FieldError, LineCodec};
pub use error::{FedicomError, Result, TransportOp};
pub use frame::{Direction, Frame, FrameType, ReasonCode};
pub use hooks::{NoopObserver, SessionObserver, TracingObserver};
pub use metrics::{FRAMES_PROCESSED, SESSION_FAILURES, SESSIONS_CLOSED};
pub use order::{OrderRequest, OrderRequestBuilder};
pub use reconcile::{
    IncidenceRecord,
    IncidenceReport,
    LineOutcome,
    Reconciliation,
    Totals,
    TotalsCalculator,
    reconcile,
};
pub use session::{Credentials, Session, SessionError, State};
