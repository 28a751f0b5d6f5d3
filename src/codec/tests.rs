//! Unit tests for CRLF line framing and reply splitting.

use bytes::{Bytes, BytesMut};
use proptest::prelude::*;
use rstest::rstest;
use tokio_util::codec::Decoder;
use tracing_test::traced_test;

use super::*;

#[test]
fn line_codec_clamps_max_line_length() {
    assert_eq!(LineCodec::new(1).max_line_length(), MIN_LINE_LENGTH);
    assert_eq!(
        LineCodec::new(MAX_LINE_LENGTH.saturating_add(1)).max_line_length(),
        MAX_LINE_LENGTH
    );
}

#[test]
fn decoder_yields_lines_without_terminators() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from(&b"0101abc\r\n0199\r\n"[..]);
    let first = codec.decode(&mut buf).expect("decode").expect("first line");
    let second = codec.decode(&mut buf).expect("decode").expect("second line");
    assert_eq!(&first[..], b"0101abc");
    assert_eq!(&second[..], b"0199");
    assert!(codec.decode(&mut buf).expect("decode").is_none());
}

#[test]
fn decoder_handles_terminator_split_across_reads() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from(&b"0199\r"[..]);
    assert!(codec.decode(&mut buf).expect("decode").is_none());
    buf.extend_from_slice(b"\n");
    let line = codec.decode(&mut buf).expect("decode").expect("line");
    assert_eq!(&line[..], b"0199");
}

#[test]
fn decoder_rejects_runaway_lines() {
    let mut codec = LineCodec::new(MIN_LINE_LENGTH);
    let mut buf = BytesMut::from(vec![b'1'; MIN_LINE_LENGTH + 1].as_slice());
    let err = codec.decode(&mut buf).expect_err("line too long");
    assert!(matches!(err, CodecError::LineTooLong { max: MIN_LINE_LENGTH, .. }));
}

#[traced_test]
#[test]
fn decode_eof_discards_unterminated_tail() {
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::from(&b"0199\r\n20"[..]);
    let line = codec.decode_eof(&mut buf).expect("decode").expect("line");
    assert_eq!(&line[..], b"0199");
    assert!(codec.decode_eof(&mut buf).expect("decode").is_none());
    assert!(buf.is_empty());
    assert!(logs_contain("discarding unterminated trailing segment"));
}

#[rstest]
#[case(&b"0101x\r\n0199\r\n"[..], 2, &b""[..])]
#[case(&b"0101x\r\n0199"[..], 1, &b"0199"[..])]
#[case(&b"0101x"[..], 0, &b"0101x"[..])]
#[case(&b""[..], 0, &b""[..])]
#[case(&b"\r\n"[..], 1, &b""[..])]
fn split_reply_excludes_final_segment(
    #[case] reply: &[u8],
    #[case] complete: usize,
    #[case] trailing: &[u8],
) {
    let lines = split_reply(&Bytes::copy_from_slice(reply));
    assert_eq!(lines.len(), complete);
    assert_eq!(&lines.trailing()[..], trailing);
}

#[traced_test]
#[test]
fn split_reply_warns_about_trailing_bytes() {
    let lines = split_reply(&Bytes::from_static(b"0199\r\ngarbage"));
    assert_eq!(lines.lines(), &[Bytes::from_static(b"0199")]);
    assert!(logs_contain("ignoring unterminated trailing segment"));
}

#[rstest]
#[case(&b"0199"[..], true)]
#[case(&b"9999NO STOCK"[..], true)]
#[case(&b"9999"[..], true)]
#[case(&b"010120240305090701FARMA01         secret   "[..], false)]
#[case(&b"2015000000000000A0002000001"[..], false)]
#[case(&b"019"[..], false)]
fn terminal_line_detection(#[case] line: &[u8], #[case] terminal: bool) {
    assert_eq!(is_terminal_line(line), terminal);
}

proptest! {
    #[test]
    fn split_reply_matches_line_count(lines in proptest::collection::vec("[0-9A-Z ]{0,30}", 0..8)) {
        let mut reply = Vec::new();
        for line in &lines {
            reply.extend_from_slice(line.as_bytes());
            reply.extend_from_slice(CRLF);
        }
        let split = split_reply(&Bytes::from(reply));
        prop_assert_eq!(split.len(), lines.len());
        prop_assert!(split.trailing().is_empty());
        for (got, want) in split.lines().iter().zip(&lines) {
            prop_assert_eq!(&got[..], want.as_bytes());
        }
    }
}
