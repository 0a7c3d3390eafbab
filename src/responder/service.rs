//! Listening loop and scoped connection ownership.
use log::{debug, info, trace, warn};
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::time::Instant;
use tokio::sync::mpsc;

use super::dispatcher::Dispatcher;
use super::packet::IncomingPacket;
use crate::meshtastic::MeshTransport;

/// Process-level responder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    Processing,
}

/// Why the listening loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    EventStreamClosed,
}

/// Owns the transport and closes it exactly once, on drop if not before.
pub struct ConnectionGuard<T: MeshTransport> {
    transport: T,
    closed: bool,
}

impl<T: MeshTransport> ConnectionGuard<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            closed: false,
        }
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.transport.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: MeshTransport> Deref for ConnectionGuard<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.transport
    }
}

impl<T: MeshTransport> DerefMut for ConnectionGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: MeshTransport> Drop for ConnectionGuard<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drain inbound packets through the dispatcher until `shutdown` resolves or
/// the transport stops delivering. The connection is released on return.
pub async fn run_until_shutdown<T, F>(
    dispatcher: &mut Dispatcher,
    connection: &mut ConnectionGuard<T>,
    events: &mut mpsc::UnboundedReceiver<IncomingPacket>,
    shutdown: F,
) -> StopReason
where
    T: MeshTransport,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut state = ListenerState::Listening;
    debug!("Listener state: {:?}", state);

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break StopReason::Shutdown;
            }
            event = events.recv() => {
                match event {
                    Some(packet) => {
                        state = ListenerState::Processing;
                        trace!("Listener state: {:?}", state);
                        let outcome = dispatcher.dispatch(&packet, &mut **connection, Instant::now());
                        debug!("Packet id={} from={} -> {:?}", packet.id, packet.from, outcome);
                        state = ListenerState::Listening;
                    }
                    None => {
                        warn!("Packet event stream closed; stopping listener");
                        break StopReason::EventStreamClosed;
                    }
                }
            }
        }
    };

    debug!("Listener left {:?} state", state);
    let stats = dispatcher.stats();
    info!(
        "Responder stopping ({:?}): {} replies sent, {} send failures, {} faults, {} senders tracked",
        reason,
        stats.replies_sent,
        stats.send_failures,
        stats.faults,
        dispatcher.tracked_senders()
    );
    connection.close();
    reason
}
