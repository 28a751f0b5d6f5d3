//! The Fedicom session state machine.
//!
//! A [`Session`] drives one exchange: it encodes the outbound frames in the
//! order the catalog allows, then folds the supplier's reply line by line,
//! refusing anything the current state does not expect and accumulating
//! incidences into an [`IncidenceReport`]. It performs no I/O; the
//! [`crate::client`] module moves the bytes.
//!
//! Legal successors come from [`FrameType::next`], so the transition table
//! lives in one declarative place and can be tested without a socket.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use chrono::NaiveDateTime;

use crate::{
    codec::{CRLF, CodecError, FieldError, split_reply},
    frame::{
        CloseSession,
        Direction,
        Frame,
        FrameType,
        InitSession,
        catalog::layout,
    },
    hooks::{SessionObserver, TracingObserver},
    order::OrderRequest,
    reconcile::{IncidenceRecord, IncidenceReport},
};

mod error;
mod state;

pub use error::SessionError;
pub use state::State;

/// Protocol user and password sent in the session opening frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    /// Validate credentials against their field widths.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the user exceeds 16 characters, the
    /// password exceeds 8, or either holds non-printable characters.
    pub fn new(user: &str, password: &str) -> Result<Self, FieldError> {
        Ok(Self {
            user: layout::USER.check_text(user)?,
            password: layout::PASSWORD.check_text(password)?,
        })
    }

    /// Protocol user.
    #[must_use]
    pub fn user(&self) -> &str { &self.user }

    /// Protocol password.
    #[must_use]
    pub fn password(&self) -> &str { &self.password }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A frame recorded in the session log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggedFrame {
    /// Which way the frame travelled.
    pub direction: Direction,
    /// The frame itself.
    pub frame: Frame,
}

/// Outcome of feeding one reply line to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// More lines are expected.
    Continue,
    /// The supplier closed the session; remaining lines are ignored.
    Closed,
}

/// One protocol exchange. Created per transmission and never reused.
#[derive(Debug)]
pub struct Session<O = TracingObserver> {
    credentials: Credentials,
    state: State,
    expected: &'static [FrameType],
    log: Vec<LoggedFrame>,
    report: IncidenceReport,
    observer: O,
}

impl Session<TracingObserver> {
    /// Create a session reporting through [`TracingObserver`].
    #[must_use]
    pub fn new(credentials: Credentials) -> Self { Self::with_observer(credentials, TracingObserver) }
}

impl<O: SessionObserver> Session<O> {
    /// Create a session reporting to `observer`.
    #[must_use]
    pub fn with_observer(credentials: Credentials, observer: O) -> Self {
        Self {
            credentials,
            state: State::Start,
            expected: &[FrameType::InitSession],
            log: Vec::new(),
            report: IncidenceReport::default(),
            observer,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> State { self.state }

    /// Frame types acceptable next.
    #[must_use]
    pub fn expected(&self) -> &'static [FrameType] { self.expected }

    /// Frames sent and accepted so far, in order.
    #[must_use]
    pub fn log(&self) -> &[LoggedFrame] { &self.log }

    /// Incidences accumulated so far.
    #[must_use]
    pub fn report(&self) -> &IncidenceReport { &self.report }

    /// Borrow the observer.
    #[must_use]
    pub fn observer(&self) -> &O { &self.observer }

    /// Credentials used to open the session.
    #[must_use]
    pub fn credentials(&self) -> &Credentials { &self.credentials }

    /// Encode `frame` into `dst`, followed by CRLF, if the session accepts
    /// it next.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OutOfSequence`] when the frame is not
    /// acceptable; the session then fails.
    pub fn send(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), SessionError> {
        let frame_type = frame.frame_type();
        if !self.state.is_sending() || !self.expected.contains(&frame_type) {
            return Err(self.reject(frame_type.code()));
        }
        frame.encode(dst);
        dst.put_slice(CRLF);
        self.state = match frame_type {
            FrameType::CloseSession => State::AwaitingInitAck,
            _ => State::SendingOrder,
        };
        self.expected = frame_type.next(Direction::Outbound);
        self.observer.frame_sent(&frame);
        self.log.push(LoggedFrame {
            direction: Direction::Outbound,
            frame,
        });
        Ok(())
    }

    /// Encode a complete exchange for `order`: session opening stamped at
    /// `timestamp`, order header, lines, trailer and close.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Field`] when the opening frame cannot be
    /// built, or [`SessionError::OutOfSequence`] when the session has already
    /// sent frames.
    pub fn encode_order(
        &mut self,
        order: &OrderRequest,
        timestamp: NaiveDateTime,
    ) -> Result<BytesMut, SessionError> {
        let init = match InitSession::new(&self.credentials, timestamp) {
            Ok(init) => init,
            Err(e) => return Err(self.fail(e.into())),
        };
        let mut dst = BytesMut::new();
        self.send(init.into(), &mut dst)?;
        for frame in order.frames() {
            self.send(frame, &mut dst)?;
        }
        self.send(CloseSession.into(), &mut dst)?;
        Ok(dst)
    }

    /// Feed one reply line, terminator removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OutOfSequence`] for an unknown or unexpected
    /// code, [`SessionError::InsufficientQuantity`] for a quantity rejection
    /// and [`SessionError::Codec`] when the line cannot be decoded. The
    /// session fails in each case.
    pub fn receive_line(&mut self, line: &[u8]) -> Result<Step, SessionError> {
        let Ok(text) = std::str::from_utf8(line) else {
            return Err(self.fail(CodecError::InvalidEncoding.into()));
        };
        let Ok(frame_type) = FrameType::identify(text) else {
            let code: String = text.chars().take(4).collect();
            return Err(self.reject(&code));
        };
        if self.state.is_sending() || self.state.is_terminal() || !self.expected.contains(&frame_type)
        {
            return Err(self.reject(frame_type.code()));
        }
        if frame_type == FrameType::QuantityRejection {
            let message = match Frame::decode(text) {
                Ok(Frame::QuantityRejection(rejection)) => rejection.message().to_owned(),
                _ => String::new(),
            };
            return Err(self.fail(SessionError::InsufficientQuantity { message }));
        }
        let frame = match Frame::decode(text) {
            Ok(frame) => frame,
            Err(e) => return Err(self.fail(e.into())),
        };
        let step = self.accept(&frame);
        self.log.push(LoggedFrame {
            direction: Direction::Inbound,
            frame,
        });
        Ok(step)
    }

    fn accept(&mut self, frame: &Frame) -> Step {
        let frame_type = frame.frame_type();
        self.state = match frame {
            Frame::InitSession(_) => State::AwaitingReply,
            Frame::IncidenceHeader(_) => State::ProcessingIncidenceHeader,
            Frame::IncidenceOrderLine(line) => {
                self.report.record(IncidenceRecord::from(line));
                State::ProcessingIncidenceLine
            }
            _ => State::Closed,
        };
        self.expected = frame_type.next(Direction::Inbound);
        self.observer.frame_accepted(self.state, frame);
        if self.state == State::Closed {
            self.observer.session_closed(&self.report);
            Step::Closed
        } else {
            Step::Continue
        }
    }

    /// Fold the reply's complete lines, terminators removed, and return the
    /// accumulated incidences. Lines after the supplier's close are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyReply`] when there are no lines,
    /// [`SessionError::Incomplete`] when they end before the close, or any
    /// error raised by [`Session::receive_line`].
    pub fn receive_lines<I>(&mut self, lines: I) -> Result<IncidenceReport, SessionError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let span = tracing::debug_span!("session.reply");
        let _enter = span.enter();
        let mut received = 0_usize;
        for line in lines {
            received += 1;
            if self.receive_line(line.as_ref())? == Step::Closed {
                return Ok(std::mem::take(&mut self.report));
            }
        }
        if received == 0 {
            return Err(self.fail(SessionError::EmptyReply));
        }
        let state = self.state;
        Err(self.fail(SessionError::Incomplete { state }))
    }

    /// Fold a complete buffered reply. The segment after the last CRLF is
    /// never processed.
    ///
    /// # Errors
    ///
    /// See [`Session::receive_lines`].
    pub fn receive_reply(&mut self, reply: &Bytes) -> Result<IncidenceReport, SessionError> {
        self.receive_lines(split_reply(reply))
    }

    fn reject(&mut self, code: &str) -> SessionError {
        let error = SessionError::OutOfSequence {
            state: self.state,
            code: code.to_owned(),
        };
        // A finished session stays as it ended and reports nothing further.
        if self.state.is_terminal() {
            return error;
        }
        self.observer.frame_rejected(self.state, &error);
        self.fail(error)
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        if self.state.is_terminal() {
            return error;
        }
        self.state = State::Failed;
        self.expected = &[];
        self.observer.session_failed(&error);
        error
    }
}
