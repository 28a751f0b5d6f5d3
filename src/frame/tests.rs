//! Unit tests for the frame catalog.

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    codec::{ArticleCode, CodecError, FieldError},
    session::Credentials,
};

fn article(code: &str) -> ArticleCode { ArticleCode::new(code).expect("valid article code") }

fn credentials() -> Credentials { Credentials::new("FARMA01", "secret").expect("valid credentials") }

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(9, 7, 1))
        .expect("valid timestamp")
}

#[rstest]
#[case(FrameType::InitSession, Some(43))]
#[case(FrameType::Order, Some(42))]
#[case(FrameType::OrderLine, Some(29))]
#[case(FrameType::FinishOrder, Some(20))]
#[case(FrameType::CloseSession, Some(4))]
#[case(FrameType::IncidenceHeader, Some(30))]
#[case(FrameType::IncidenceOrderLine, Some(27))]
#[case(FrameType::QuantityRejection, None)]
fn catalog_widths(#[case] frame_type: FrameType, #[case] width: Option<usize>) {
    assert_eq!(frame_type.width(), width);
}

#[test]
fn codes_are_unique_and_resolvable() {
    for frame_type in FrameType::ALL {
        assert_eq!(FrameType::from_code(frame_type.code()), Some(frame_type));
    }
    assert_eq!(FrameType::from_code("1234"), None);
}

#[rstest]
#[case(FrameType::InitSession, Direction::Outbound, &[FrameType::Order][..])]
#[case(FrameType::OrderLine, Direction::Outbound, &[FrameType::OrderLine, FrameType::FinishOrder][..])]
#[case(FrameType::CloseSession, Direction::Outbound, &[FrameType::InitSession, FrameType::QuantityRejection][..])]
#[case(FrameType::IncidenceHeader, Direction::Inbound, &[FrameType::IncidenceOrderLine, FrameType::CloseSession][..])]
#[case(FrameType::CloseSession, Direction::Inbound, &[][..])]
#[case(FrameType::QuantityRejection, Direction::Inbound, &[][..])]
#[case(FrameType::Order, Direction::Inbound, &[][..])]
fn next_sets(
    #[case] frame_type: FrameType,
    #[case] direction: Direction,
    #[case] expected: &[FrameType],
) {
    assert_eq!(frame_type.next(direction), expected);
}

#[test]
fn init_ack_accepts_every_reply_opening() {
    let next = FrameType::InitSession.next(Direction::Inbound);
    for frame_type in [
        FrameType::IncidenceHeader,
        FrameType::IncidenceOrderLine,
        FrameType::CloseSession,
        FrameType::QuantityRejection,
    ] {
        assert!(next.contains(&frame_type), "{frame_type} missing");
    }
}

#[test]
fn display_names_type_and_code() {
    assert_eq!(FrameType::OrderLine.to_string(), "OrderLine (1020)");
}

#[test]
fn init_session_layout() {
    let frame = Frame::from(InitSession::new(&credentials(), timestamp()).expect("valid frame"));
    let line = frame.to_line();
    assert_eq!(&line[..], b"010120240305090701FARMA01         secret   ".as_slice());
}

#[test]
fn order_line_layout() {
    let line = OrderLine::new(article("8470001234"), 12)
        .and_then(|l| l.with_bonus(1))
        .and_then(|l| l.with_discount(550))
        .map(Frame::from)
        .expect("valid frame")
        .to_line();
    assert_eq!(&line[..], b"10200008470001234001200010550".as_slice());
}

#[test]
fn finish_order_summarises_lines() {
    let lines = [
        OrderLine::new(article("1"), 5).expect("valid line"),
        OrderLine::new(article("2"), 7)
            .and_then(|l| l.with_bonus(2))
            .expect("valid line"),
    ];
    let finish = FinishOrder::summarising(&lines).expect("fits");
    assert_eq!(finish.line_count(), 2);
    assert_eq!(finish.total_quantity(), 12);
    assert_eq!(finish.total_bonus(), 2);
    assert_eq!(&Frame::from(finish).to_line()[..], b"10500002000012000002".as_slice());
}

#[test]
fn finish_order_rejects_oversized_totals() {
    let lines: Vec<_> = (0..101)
        .map(|i| OrderLine::new(article(&i.to_string()), 9_999).expect("valid line"))
        .collect();
    let err = FinishOrder::summarising(&lines).expect_err("total overflows");
    assert!(matches!(err, FieldError::Overflow { field: "total_quantity", .. }));
}

#[test]
fn order_rejects_empty_customer() {
    assert_eq!(
        Order::new("  ", 1),
        Err(FieldError::Empty { field: "customer_code" })
    );
}

#[test]
fn text_fields_drop_trailing_spaces() {
    let credentials = Credentials::new("FARMA01 ", "pw  ").expect("valid credentials");
    assert_eq!(credentials.user(), "FARMA01");
    assert_eq!(credentials.password(), "pw");
    let order = Order::new(" CUST1 ", 1).expect("valid header");
    assert_eq!(order.customer_code(), " CUST1");
}

#[test]
fn order_line_quantity_must_fit() {
    let err = OrderLine::new(article("1"), 10_000).expect_err("quantity overflows");
    assert_eq!(err.to_string(), "quantity value 10000 does not fit in 4 digits");
}

#[rstest]
#[case(Frame::from(InitSession::new(&credentials(), timestamp()).expect("valid")))]
#[case(Frame::from(
    Order::new("CUST1", 42)
        .and_then(|o| o.with_order_type("NORMAL"))
        .and_then(|o| o.with_conditions("C1"))
        .expect("valid")
))]
#[case(Frame::from(OrderLine::new(article("847000"), 3).expect("valid")))]
#[case(Frame::from(
    FinishOrder::summarising(&[
        OrderLine::new(article("1"), 5).expect("valid"),
        OrderLine::new(article("2"), 9_999)
            .and_then(|l| l.with_bonus(3))
            .expect("valid"),
    ])
    .expect("valid")
))]
#[case(Frame::from(CloseSession))]
#[case(Frame::from(
    InitSession::new(
        &Credentials::new("FARMA01 ", "pw ").expect("valid"),
        timestamp()
    )
    .expect("valid")
))]
#[case(Frame::from(Order::new("CUST1   ", 7).expect("valid")))]
#[case(Frame::from(IncidenceHeader::new("CUST1", 42).expect("valid")))]
#[case(Frame::from(
    IncidenceOrderLine::new(article("847000"), 2, ReasonCode::OUT_OF_STOCK)
        .and_then(|l| l.with_bonus_not_served(1))
        .expect("valid")
))]
#[case(Frame::from(QuantityRejection::new("STOCK INSUFICIENTE").expect("valid")))]
fn frames_decode_what_they_encode(#[case] frame: Frame) {
    let line = frame.to_line();
    let text = std::str::from_utf8(&line).expect("ascii");
    assert_eq!(Frame::decode(text).expect("decodes"), frame);
}

#[test]
fn incidence_line_fields_are_positional() {
    let frame = Frame::decode("201500084700012340003000101").expect("decodes");
    let Frame::IncidenceOrderLine(line) = &frame else {
        panic!("expected incidence line, got {frame:?}");
    };
    assert_eq!(line.article().as_str(), "0008470001234");
    assert_eq!(line.amount_not_served(), 3);
    assert_eq!(line.bonus_not_served(), 1);
    assert_eq!(line.reason(), ReasonCode::OUT_OF_STOCK);
}

#[test]
fn quantity_rejection_has_no_fixed_width() {
    let frame = Frame::decode("9999CANTIDAD NO DISPONIBLE").expect("decodes");
    assert_eq!(frame.frame_type(), FrameType::QuantityRejection);
    let bare = Frame::decode("9999").expect("decodes");
    assert_eq!(bare, Frame::QuantityRejection(QuantityRejection::default()));
}

#[rstest]
#[case("1020000847000123400120001055", "malformed OrderLine (1020) frame: 28 characters, expected 29")]
#[case("01990", "malformed CloseSession (0199) frame: 5 characters, expected 4")]
#[case("7777abc", "unknown frame type \"7777\"")]
#[case("01", "unknown frame type \"01\"")]
#[case("2015000847000123400A3000101", "malformed field amount_not_served in IncidenceOrderLine (2015) frame: \"00A3\"")]
#[case("201500084700012340003001x01", "malformed field bonus_not_served in IncidenceOrderLine (2015) frame: \"001x\"")]
#[case("0199\u{7f}", "frame is not valid ASCII text")]
fn decode_errors_describe_the_damage(#[case] line: &str, #[case] message: &str) {
    let err = Frame::decode(line).expect_err("line is damaged");
    assert_eq!(err.to_string(), message);
}

#[test]
fn unknown_code_is_reported_before_length() {
    let err = Frame::decode("12345678901234567890").expect_err("unknown code");
    assert!(matches!(err, CodecError::UnknownFrameType { ref code } if code == "1234"));
    assert_eq!(err.error_type(), "unknown_type");
}

proptest! {
    #[test]
    fn order_lines_survive_the_wire(
        code in "[0-9A-Z]{1,13}",
        quantity in 0u32..10_000,
        bonus in 0u32..10_000,
        discount in 0u32..10_000,
    ) {
        let line = OrderLine::new(article(&code), quantity)
            .and_then(|l| l.with_bonus(bonus))
            .and_then(|l| l.with_discount(discount))
            .expect("values fit");
        let frame = Frame::from(line);
        let encoded = frame.to_line();
        prop_assert_eq!(encoded.len(), 29);
        let text = std::str::from_utf8(&encoded).expect("ascii");
        prop_assert_eq!(Frame::decode(text).expect("decodes"), frame);
    }

    #[test]
    fn text_values_survive_the_wire(
        user in "[ -~]{0,16}",
        password in "[ -~]{0,8}",
    ) {
        let credentials = Credentials::new(&user, &password).expect("values fit");
        let frame = Frame::from(InitSession::new(&credentials, timestamp()).expect("valid"));
        let encoded = frame.to_line();
        let text = std::str::from_utf8(&encoded).expect("ascii");
        prop_assert_eq!(Frame::decode(text).expect("decodes"), frame);
    }

    #[test]
    fn decode_never_panics(line in "\\PC{0,64}") {
        let _ = Frame::decode(&line);
    }
}
