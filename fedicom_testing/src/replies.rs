//! Builders for supplier reply streams.

use bytes::{Bytes, BytesMut};
use chrono::{NaiveDate, NaiveDateTime};
use fedicom::{
    codec::ArticleCode,
    frame::{CloseSession, Frame, IncidenceHeader, IncidenceOrderLine, InitSession, ReasonCode},
    session::Credentials,
};

/// Credentials accepted by every scripted supplier.
#[must_use]
pub fn test_credentials() -> Credentials {
    Credentials::new("FARMA01", "secret").expect("test credentials fit their fields")
}

/// Timestamp used for acknowledgements built by [`ReplyBuilder::ack`].
#[must_use]
pub fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(9, 7, 1))
        .expect("fixed timestamp is valid")
}

/// Assembles a CRLF-delimited supplier reply.
///
/// Helpers building frames panic on invalid input; they are meant for tests
/// with literal values.
#[derive(Debug, Default)]
pub struct ReplyBuilder {
    buf: BytesMut,
}

impl ReplyBuilder {
    /// Start an empty reply.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append `frame` followed by CRLF.
    #[must_use]
    pub fn frame(mut self, frame: impl Into<Frame>) -> Self {
        frame.into().encode(&mut self.buf);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Append `line` verbatim followed by CRLF.
    #[must_use]
    pub fn line(mut self, line: &str) -> Self {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Append bytes with no terminator.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append the session acknowledgement.
    #[must_use]
    pub fn ack(self) -> Self {
        let ack = InitSession::new(&test_credentials(), fixed_timestamp())
            .expect("acknowledgement fields are valid");
        self.frame(ack)
    }

    /// Append an incidence header for `customer`.
    #[must_use]
    pub fn header(self, customer: &str, order_number: u64) -> Self {
        let header = IncidenceHeader::new(customer, order_number).expect("valid incidence header");
        self.frame(header)
    }

    /// Append an incidence line reporting `not_served` units of `article`.
    #[must_use]
    pub fn incidence(self, article: &str, not_served: u32, reason: u8) -> Self {
        let article = ArticleCode::new(article).expect("valid article code");
        let reason = ReasonCode::new(reason).expect("valid reason code");
        let line = IncidenceOrderLine::new(article, not_served, reason).expect("valid incidence");
        self.frame(line)
    }

    /// Append a quantity rejection carrying `message`.
    #[must_use]
    pub fn rejection(self, message: &str) -> Self { self.line(&format!("9999{message}")) }

    /// Append the close acknowledgement.
    #[must_use]
    pub fn close(self) -> Self { self.frame(CloseSession) }

    /// Finish the reply.
    #[must_use]
    pub fn build(self) -> Bytes { self.buf.freeze() }
}
