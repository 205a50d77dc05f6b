//! In-memory collaborators.
//!
//! Cheap, cloneable implementations of the integration traits. Clones share
//! state, so a test (or the drill binary) can hand one clone to a node and keep
//! another to inspect or mutate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bastion_shared::{ActorId, EntityHandle, ProcessId, WireMessage};
use parking_lot::{Mutex, RwLock};

use super::{AuthorityOracle, EntityDirectory, Transport};

/// Single-host authority: one process owns every actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticAuthority {
    /// Local process.
    pub local: ProcessId,
    /// The host process.
    pub host: ProcessId,
}

impl StaticAuthority {
    /// Oracle for the host process itself.
    #[must_use]
    pub const fn host(host: ProcessId) -> Self {
        Self { local: host, host }
    }

    /// Oracle for a client of `host`.
    #[must_use]
    pub const fn client(local: ProcessId, host: ProcessId) -> Self {
        Self { local, host }
    }
}

impl AuthorityOracle for StaticAuthority {
    fn is_authoritative(&self, _actor: ActorId) -> bool {
        self.local == self.host
    }

    fn host_of(&self, _actor: ActorId) -> ProcessId {
        self.host
    }
}

/// Shared entity registry.
#[derive(Clone, Debug, Default)]
pub struct SharedDirectory {
    entries: Arc<RwLock<HashMap<ActorId, EntityHandle>>>,
    lookups: Arc<AtomicU64>,
}

impl SharedDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an entity.
    pub fn register(&self, handle: EntityHandle) {
        self.entries.write().insert(handle.id, handle);
    }

    /// Removes an entity. Later lookups of its id return `None`.
    pub fn remove(&self, id: ActorId) -> Option<EntityHandle> {
        self.entries.write().remove(&id)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total lookups served since creation.
    #[must_use]
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl EntityDirectory for SharedDirectory {
    fn lookup(&self, id: ActorId) -> Option<EntityHandle> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.entries.read().get(&id).copied()
    }
}

/// A message captured by [`RecordingTransport`].
#[derive(Clone, Debug, PartialEq)]
pub enum Outgoing {
    /// Directed send.
    Direct {
        /// Recipient.
        target: ProcessId,
        /// Payload.
        message: WireMessage,
    },
    /// Broadcast.
    Broadcast(WireMessage),
}

/// Transport that records instead of delivering.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Outgoing>>>,
}

impl RecordingTransport {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Outgoing> {
        self.sent.lock().clone()
    }

    /// Drains the record.
    pub fn take(&self) -> Vec<Outgoing> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Directed messages sent to `target`.
    #[must_use]
    pub fn directed_to(&self, target: ProcessId) -> Vec<WireMessage> {
        self.sent
            .lock()
            .iter()
            .filter_map(|out| match out {
                Outgoing::Direct { target: t, message } if *t == target => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Broadcast messages.
    #[must_use]
    pub fn broadcasts(&self) -> Vec<WireMessage> {
        self.sent
            .lock()
            .iter()
            .filter_map(|out| match out {
                Outgoing::Broadcast(message) => Some(message.clone()),
                Outgoing::Direct { .. } => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, target: ProcessId, message: WireMessage) {
        self.sent.lock().push(Outgoing::Direct { target, message });
    }

    fn broadcast(&self, message: WireMessage) {
        self.sent.lock().push(Outgoing::Broadcast(message));
    }
}
