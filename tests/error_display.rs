//! Tests for Display implementations on error types.

use std::io;

use fedicom::{
    CodecError,
    FedicomError,
    FieldError,
    FrameType,
    SessionError,
    State,
    TransportOp,
};
use rstest::rstest;

#[test]
fn field_error_messages() {
    let overflow = FieldError::Overflow {
        field: "quantity",
        value: 10_000,
        width: 4,
    };
    assert_eq!(overflow.to_string(), "quantity value 10000 does not fit in 4 digits");
    let long = FieldError::TooLong {
        field: "user",
        len: 17,
        width: 16,
    };
    assert_eq!(long.to_string(), "user is 17 characters long, maximum is 16");
}

#[test]
fn codec_error_messages() {
    let frame = CodecError::MalformedFrame {
        frame: FrameType::IncidenceOrderLine,
        len: 26,
        expected: 27,
    };
    assert_eq!(
        frame.to_string(),
        "malformed IncidenceOrderLine (2015) frame: 26 characters, expected 27"
    );
    let unknown = CodecError::UnknownFrameType {
        code: "3000".into(),
    };
    assert_eq!(unknown.to_string(), "unknown frame type \"3000\"");
}

#[test]
fn session_error_messages() {
    let incomplete = SessionError::Incomplete {
        state: State::ProcessingIncidenceLine,
    };
    assert_eq!(
        incomplete.to_string(),
        "supplier reply ended in state processing_incidence_line without closing the session"
    );
}

#[rstest]
#[case(
    FedicomError::ConnectionFailed {
        operation: TransportOp::Connect,
        source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
    },
    "connect failed: refused",
    "connection"
)]
#[case(
    FedicomError::OutOfSequence { state: State::AwaitingReply, code: "1010".into() },
    "frame \"1010\" out of sequence in state awaiting_reply",
    "sequence"
)]
#[case(
    FedicomError::InsufficientQuantity { message: "NO STOCK".into() },
    "insufficient quantity: \"NO STOCK\"",
    "insufficient_quantity"
)]
#[case(
    FedicomError::Protocol(SessionError::EmptyReply),
    "protocol error: supplier reply contained no complete frame",
    "protocol"
)]
#[case(
    FedicomError::Field(FieldError::Empty { field: "order_lines" }),
    "invalid field: order_lines must not be empty",
    "field"
)]
fn fedicom_error_messages(
    #[case] error: FedicomError,
    #[case] message: &str,
    #[case] error_type: &str,
) {
    assert_eq!(error.to_string(), message);
    assert_eq!(error.error_type(), error_type);
}

#[test]
fn session_errors_convert_by_category() {
    let receive: FedicomError = SessionError::Codec(CodecError::Io(io::Error::other("reset"))).into();
    assert!(matches!(
        receive,
        FedicomError::ConnectionFailed {
            operation: TransportOp::Receive,
            ..
        }
    ));
    let sequence: FedicomError = SessionError::OutOfSequence {
        state: State::ProcessingIncidenceHeader,
        code: "1020".into(),
    }
    .into();
    assert_eq!(sequence.error_type(), "sequence");
    let malformed: FedicomError = SessionError::Codec(CodecError::InvalidEncoding).into();
    assert_eq!(malformed.error_type(), "malformed");
}
