//! In-process loopback transport.
//!
//! Every process connected to a [`LoopbackHub`] gets a transport handle and an
//! [`Inbox`]. Delivery is an unbounded `crossbeam` queue per process, so host
//! and clients can run on one thread (tests) or one thread each.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bastion_shared::{ProcessId, WireMessage};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;

use super::Transport;

/// A delivered message and its sender.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Sending process.
    pub from: ProcessId,
    /// Payload.
    pub message: WireMessage,
}

/// Receiving side of one process.
#[derive(Debug)]
pub struct Inbox {
    process: ProcessId,
    rx: Receiver<Envelope>,
}

impl Inbox {
    /// Process this inbox belongs to.
    #[must_use]
    pub const fn process(&self) -> ProcessId {
        self.process
    }

    /// Takes one pending message, if any.
    #[must_use]
    pub fn try_recv(&self) -> Option<Envelope> {
        self.rx.try_recv().ok()
    }

    /// Takes every pending message.
    #[must_use]
    pub fn drain(&self) -> Vec<Envelope> {
        self.rx.try_iter().collect()
    }

    /// Number of pending messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Delivery statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopbackStats {
    /// Messages placed in an inbox.
    pub delivered: u64,
    /// Messages whose recipient was not connected.
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct HubInner {
    endpoints: RwLock<HashMap<ProcessId, Sender<Envelope>>>,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// Switchboard connecting in-process nodes.
#[derive(Clone, Debug, Default)]
pub struct LoopbackHub {
    inner: Arc<HubInner>,
}

impl LoopbackHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a process. Reconnecting replaces the previous inbox.
    #[must_use]
    pub fn connect(&self, process: ProcessId) -> (LoopbackTransport, Inbox) {
        let (tx, rx) = unbounded();
        self.inner.endpoints.write().insert(process, tx);
        let transport = LoopbackTransport {
            local: process,
            hub: self.clone(),
        };
        (transport, Inbox { process, rx })
    }

    /// Delivery statistics.
    #[must_use]
    pub fn stats(&self) -> LoopbackStats {
        LoopbackStats {
            delivered: self.inner.delivered.load(Ordering::Relaxed),
            dropped: self.inner.dropped.load(Ordering::Relaxed),
        }
    }

    fn deliver(&self, from: ProcessId, target: ProcessId, message: WireMessage) {
        let endpoints = self.inner.endpoints.read();
        let delivered = endpoints
            .get(&target)
            .is_some_and(|tx| tx.send(Envelope { from, message }).is_ok());

        if delivered {
            self.inner.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("loopback: {} -> {} dropped (not connected)", from, target);
        }
    }
}

/// Sending side of one process.
#[derive(Clone, Debug)]
pub struct LoopbackTransport {
    local: ProcessId,
    hub: LoopbackHub,
}

impl Transport for LoopbackTransport {
    fn send(&self, target: ProcessId, message: WireMessage) {
        self.hub.deliver(self.local, target, message);
    }

    fn broadcast(&self, message: WireMessage) {
        let targets: Vec<ProcessId> = self
            .hub
            .inner
            .endpoints
            .read()
            .keys()
            .copied()
            .filter(|p| *p != self.local)
            .collect();

        for target in targets {
            self.hub.deliver(self.local, target, message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_shared::ActorId;

    fn retired(id: u32) -> WireMessage {
        WireMessage::ActorRetired { actor: ActorId(id) }
    }

    #[test]
    fn test_directed_delivery() {
        let hub = LoopbackHub::new();
        let (host, _host_inbox) = hub.connect(ProcessId(0));
        let (_client, client_inbox) = hub.connect(ProcessId(1));

        host.send(ProcessId(1), retired(7));

        let envelope = client_inbox.try_recv().unwrap();
        assert_eq!(envelope.from, ProcessId(0));
        assert_eq!(envelope.message, retired(7));
        assert!(client_inbox.is_empty());
    }

    #[test]
    fn test_broadcast_skips_sender() {
        let hub = LoopbackHub::new();
        let (host, host_inbox) = hub.connect(ProcessId(0));
        let (_a, inbox_a) = hub.connect(ProcessId(1));
        let (_b, inbox_b) = hub.connect(ProcessId(2));

        host.broadcast(retired(1));

        assert!(host_inbox.is_empty());
        assert_eq!(inbox_a.len(), 1);
        assert_eq!(inbox_b.drain().len(), 1);
        assert_eq!(hub.stats().delivered, 2);
    }

    #[test]
    fn test_unknown_target_is_dropped() {
        let hub = LoopbackHub::new();
        let (host, _inbox) = hub.connect(ProcessId(0));

        host.send(ProcessId(9), retired(1));
        assert_eq!(hub.stats().dropped, 1);

        let (_late, late_inbox) = hub.connect(ProcessId(9));
        host.send(ProcessId(9), retired(2));
        assert_eq!(late_inbox.len(), 1);
        assert_eq!(hub.stats().delivered, 1);
    }
}
