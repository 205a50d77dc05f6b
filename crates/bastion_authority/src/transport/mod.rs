//! # Integration Traits
//!
//! The authority model never reaches for a global. Everything it needs from
//! the outside world is injected through [`AuthorityContext`]:
//!
//! ```text
//! AuthorityNode needs:     Outside world provides:
//! ┌──────────────────┐     ┌──────────────────────────┐
//! │ Transport        │ ←── │ UDP / RPC library / test │
//! │ AuthorityOracle  │ ←── │ session / ownership info │
//! │ EntityDirectory  │ ←── │ world entity registry    │
//! └──────────────────┘     └──────────────────────────┘
//! ```

mod loopback;
mod memory;

pub use loopback::{Envelope, Inbox, LoopbackHub, LoopbackStats, LoopbackTransport};
pub use memory::{Outgoing, RecordingTransport, SharedDirectory, StaticAuthority};

use std::sync::Arc;

use bastion_shared::{ActorId, EntityHandle, ProcessId, WireMessage};

/// Message delivery between processes.
///
/// Both primitives are fire-and-forget. Reliability, retries and ordering are
/// the implementation's concern, not the caller's.
pub trait Transport: Send + Sync {
    /// Sends a message to one process.
    fn send(&self, target: ProcessId, message: WireMessage);

    /// Sends a message to every other process.
    fn broadcast(&self, message: WireMessage);
}

/// Answers "who may write this actor's health?".
pub trait AuthorityOracle: Send + Sync {
    /// Whether the local process is the authoritative host for `actor`.
    fn is_authoritative(&self, actor: ActorId) -> bool;

    /// Process that holds authority over `actor`.
    fn host_of(&self, actor: ActorId) -> ProcessId;
}

/// Process-wide registry of spawned entities.
pub trait EntityDirectory: Send + Sync {
    /// Looks up a live entity. `None` if it was never spawned or is gone.
    fn lookup(&self, id: ActorId) -> Option<EntityHandle>;
}

/// Everything an authority node needs from its host process.
#[derive(Clone)]
pub struct AuthorityContext {
    /// Id of the local process.
    pub process: ProcessId,
    /// Authority predicate.
    pub oracle: Arc<dyn AuthorityOracle>,
    /// Entity registry.
    pub directory: Arc<dyn EntityDirectory>,
    /// Outbound messages.
    pub transport: Arc<dyn Transport>,
}

impl AuthorityContext {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(
        process: ProcessId,
        oracle: Arc<dyn AuthorityOracle>,
        directory: Arc<dyn EntityDirectory>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            process,
            oracle,
            directory,
            transport,
        }
    }
}
