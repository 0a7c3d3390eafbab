mod common;

use common::{dispatcher_on_channel, reference_packet, FakeTransport};
use meshresponder::responder::{run_until_shutdown, ConnectionGuard, StopReason};
use tokio::sync::{mpsc, oneshot};

#[tokio::test]
async fn test_event_stream_end_stops_loop_and_closes_once() {
    let radio = FakeTransport::new();
    let observer = radio.clone();
    let mut connection = ConnectionGuard::new(radio);
    let mut dispatcher = dispatcher_on_channel(4);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let pkt = reference_packet(0x1234, "hi");
    tx.send(pkt.clone()).unwrap();
    tx.send(pkt).unwrap();
    drop(tx);

    let reason = run_until_shutdown(
        &mut dispatcher,
        &mut connection,
        &mut rx,
        std::future::pending::<()>(),
    )
    .await;

    assert_eq!(reason, StopReason::EventStreamClosed);
    assert_eq!(observer.sent().len(), 1);
    assert!(connection.is_closed());
    drop(connection);
    assert_eq!(observer.close_count(), 1);
}

#[tokio::test]
async fn test_shutdown_signal_stops_loop() {
    let radio = FakeTransport::new();
    let observer = radio.clone();
    let mut connection = ConnectionGuard::new(radio);
    let mut dispatcher = dispatcher_on_channel(4);
    let (_tx, mut rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    stop_tx.send(()).unwrap();
    let reason = run_until_shutdown(&mut dispatcher, &mut connection, &mut rx, async {
        let _ = stop_rx.await;
    })
    .await;

    assert_eq!(reason, StopReason::Shutdown);
    assert_eq!(observer.close_count(), 1);
    assert!(observer.sent().is_empty());
}

#[test]
fn test_guard_closes_on_drop() {
    let radio = FakeTransport::new();
    let observer = radio.clone();
    {
        let _connection = ConnectionGuard::new(radio);
    }
    assert_eq!(observer.close_count(), 1);
}
