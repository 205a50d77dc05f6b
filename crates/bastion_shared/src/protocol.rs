//! Replicated messages exchanged between host and clients.
//!
//! These types describe WHAT crosses the wire, not how. Framing and encoding
//! are the transport's business.

use crate::damage::{DamageKind, DamageRequest};
use crate::ids::ActorId;
use serde::{Deserialize, Serialize};

/// Replicated health record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Actor id (raw).
    pub actor: u32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Flags (bit 0 = dead latch set).
    pub flags: u32,
}

impl HealthSnapshot {
    /// Flag bit set once the actor's death has been announced.
    pub const FLAG_DEAD: u32 = 1;

    /// Creates a snapshot.
    #[must_use]
    pub const fn new(actor: ActorId, health: f32, max_health: f32, dead: bool) -> Self {
        Self {
            actor: actor.0,
            health,
            max_health,
            flags: if dead { Self::FLAG_DEAD } else { 0 },
        }
    }

    /// Actor this record describes.
    #[must_use]
    pub const fn actor_id(&self) -> ActorId {
        ActorId(self.actor)
    }

    /// Whether the death latch was set on the host.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.flags & Self::FLAG_DEAD != 0
    }
}

/// Messages the authority model sends between processes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    /// Client -> host: please apply this damage.
    Damage(DamageRequest),

    /// Host -> everyone: an actor's health changed (new value, not a delta).
    HealthChanged(HealthSnapshot),

    /// Host -> everyone: an actor died. Sent once per life.
    ActorDied {
        /// Actor that died.
        actor: ActorId,
        /// Entity credited with the kill. Receivers resolve it themselves.
        source: ActorId,
        /// Kind of the lethal damage.
        kind: DamageKind,
    },

    /// Host -> owning client only: your actor was hit.
    DamageFeedback {
        /// Actor that was hit.
        actor: ActorId,
        /// Attacking entity.
        source: ActorId,
        /// Damage classification.
        kind: DamageKind,
    },

    /// Host -> everyone: an actor left the world.
    ActorRetired {
        /// Retired actor.
        actor: ActorId,
    },
}
