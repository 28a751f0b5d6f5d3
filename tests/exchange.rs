//! End-to-end exchanges against a scripted supplier over loopback TCP.

use std::{io, time::Duration};

use fedicom::{
    FedicomError,
    TransportOp,
    client::{FedicomClient, PartyProfile, SocketOptions, submit_order},
    frame::{Order, ReasonCode},
    order::OrderRequest,
    reconcile::LineOutcome,
    session::SessionError,
};
use fedicom_testing::{ReplyBuilder, SupplierMode, spawn_supplier, test_credentials, unused_listener};
use rstest::{fixture, rstest};

#[fixture]
fn order() -> OrderRequest {
    let header = Order::new("CUST0001", 42).expect("valid header");
    OrderRequest::builder("PO-42", header)
        .article("8470001234", 7)
        .and_then(|b| b.article("8470005678", 3))
        .and_then(|b| b.build())
        .expect("valid order")
}

fn profile(port: u16) -> PartyProfile {
    PartyProfile::new("127.0.0.1", port, test_credentials())
        .party_code("SUP-9")
        .timeout(Duration::from_secs(5))
        .socket_options(SocketOptions::default().nodelay(true))
}

#[rstest]
#[tokio::test]
async fn partial_incidence_produces_backorder(order: OrderRequest) {
    let reply = ReplyBuilder::new()
        .ack()
        .header("CUST0001", 42)
        .incidence("8470001234", 2, 1)
        .close()
        .build();
    let supplier = spawn_supplier(SupplierMode::Reply(reply))
        .await
        .expect("spawn supplier");

    let reconciliation = submit_order(&profile(supplier.port()), &order)
        .await
        .expect("exchange succeeds")
        .expect("incidences reported");

    let sent = supplier.received().await.expect("supplier result");
    let codes: Vec<String> = sent
        .split(|b| *b == b'\n')
        .filter(|l| l.len() >= 4)
        .map(|l| String::from_utf8_lossy(&l[..4]).into_owned())
        .collect();
    assert_eq!(codes, ["0101", "1010", "1020", "1020", "1050", "0199"]);

    let [a, b] = reconciliation.lines() else {
        panic!("expected two adjusted lines");
    };
    assert_eq!((a.requested(), a.quantity()), (7, 5));
    assert_eq!(
        a.outcome(),
        LineOutcome::PartiallyServed {
            not_served: 2,
            reason: ReasonCode::OUT_OF_STOCK,
        }
    );
    assert_eq!(b.quantity(), 3);
    assert_eq!(b.outcome(), LineOutcome::Served { reason: None });

    let backorder = reconciliation.backorder();
    assert_eq!(backorder.lines().len(), 1);
    assert_eq!(backorder.lines()[0].quantity(), 2);
    assert_eq!(backorder.lines()[0].reason(), ReasonCode::OUT_OF_STOCK);
}

#[rstest]
#[tokio::test]
async fn acknowledged_close_yields_no_reconciliation(order: OrderRequest) {
    let reply = ReplyBuilder::new().ack().close().build();
    let supplier = spawn_supplier(SupplierMode::Reply(reply))
        .await
        .expect("spawn supplier");
    let result = submit_order(&profile(supplier.port()), &order)
        .await
        .expect("exchange succeeds");
    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn reply_read_stops_at_close_while_connection_stays_open(order: OrderRequest) {
    let reply = ReplyBuilder::new().ack().incidence("8470005678", 3, 2).close().build();
    let supplier = spawn_supplier(SupplierMode::ReplyAndLinger(reply))
        .await
        .expect("spawn supplier");
    let mut client = FedicomClient::connect(&profile(supplier.port()))
        .await
        .expect("connect");
    let reconciliation = client
        .submit(&order)
        .await
        .expect("exchange succeeds")
        .expect("incidences reported");
    client.close().await.expect("close");

    let b = &reconciliation.lines()[1];
    assert_eq!(b.quantity(), 0);
    assert_eq!(
        b.outcome(),
        LineOutcome::Unserved {
            reason: ReasonCode::DISCONTINUED
        }
    );
    supplier.received().await.expect("supplier result");
}

#[rstest]
#[tokio::test]
async fn quantity_rejection_fails_the_exchange(order: OrderRequest) {
    let reply = ReplyBuilder::new().ack().rejection("CUPO EXCEDIDO").build();
    let supplier = spawn_supplier(SupplierMode::Reply(reply))
        .await
        .expect("spawn supplier");
    let err = submit_order(&profile(supplier.port()), &order)
        .await
        .expect_err("rejected");
    assert!(matches!(
        err,
        FedicomError::InsufficientQuantity { ref message } if message == "CUPO EXCEDIDO"
    ));
}

#[rstest]
#[tokio::test]
async fn unexpected_frame_after_header_is_out_of_sequence(order: OrderRequest) {
    let reply = ReplyBuilder::new()
        .ack()
        .header("CUST0001", 42)
        .header("CUST0001", 42)
        .close()
        .build();
    let supplier = spawn_supplier(SupplierMode::Reply(reply))
        .await
        .expect("spawn supplier");
    let err = submit_order(&profile(supplier.port()), &order)
        .await
        .expect_err("out of sequence");
    assert!(matches!(err, FedicomError::OutOfSequence { ref code, .. } if code == "2010"));
}

#[rstest]
#[tokio::test]
async fn hangup_without_reply_is_a_protocol_error(order: OrderRequest) {
    let supplier = spawn_supplier(SupplierMode::Hangup)
        .await
        .expect("spawn supplier");
    let err = submit_order(&profile(supplier.port()), &order)
        .await
        .expect_err("no reply");
    assert!(matches!(err, FedicomError::Protocol(SessionError::EmptyReply)));
}

#[rstest]
#[tokio::test]
async fn silent_supplier_times_out(order: OrderRequest) {
    let supplier = spawn_supplier(SupplierMode::Silent)
        .await
        .expect("spawn supplier");
    let profile = profile(supplier.port()).timeout(Duration::from_millis(200));
    let err = submit_order(&profile, &order)
        .await
        .expect_err("timed out");
    assert!(matches!(
        err,
        FedicomError::ConnectionFailed {
            operation: TransportOp::Receive,
            ref source,
        } if source.kind() == io::ErrorKind::TimedOut
    ));
}

#[rstest]
#[tokio::test]
async fn closed_port_fails_to_connect(order: OrderRequest) {
    let port = {
        let listener = unused_listener().expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let err = submit_order(&profile(port), &order)
        .await
        .expect_err("nothing listening");
    assert!(matches!(
        err,
        FedicomError::ConnectionFailed {
            operation: TransportOp::Connect,
            ..
        }
    ));
    assert_eq!(err.error_type(), "connection");
}
