//! Observer events.
//!
//! Raised locally on whichever process learns about the change: the host when
//! it applies damage, clients when the matching broadcast or directed message
//! arrives. Observers never see deltas, only resulting values.

use crate::damage::DamageKind;
use crate::ids::{ActorId, EntityHandle};
use serde::{Deserialize, Serialize};

/// Event type discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Health value changed
    HealthChanged = 0,
    /// Actor died
    Died = 1,
    /// Local-only hit feedback
    HitFeedback = 2,
    /// Actor left the world
    Retired = 3,
}

/// Events delivered to subscribers of an authority node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActorEvent {
    /// Health changed.
    HealthChanged {
        /// Actor.
        actor: ActorId,
        /// New health value.
        health: f32,
    },

    /// Actor died. Delivered once per life.
    Died {
        /// Actor that died.
        actor: ActorId,
        /// Raw id of the entity credited with the kill.
        source: ActorId,
        /// Killer, if it still resolved when the death was processed.
        killer: Option<EntityHandle>,
        /// Kind of the lethal damage.
        kind: DamageKind,
    },

    /// The local player's actor was hit (owning client only).
    HitFeedback {
        /// Actor that was hit.
        actor: ActorId,
        /// Raw attacker id.
        source: ActorId,
        /// Attacker, if it resolved on this process.
        attacker: Option<EntityHandle>,
        /// Damage classification.
        kind: DamageKind,
    },

    /// Actor was removed from the world.
    Retired {
        /// Actor.
        actor: ActorId,
    },
}

impl ActorEvent {
    /// Returns the event type
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::HealthChanged { .. } => EventType::HealthChanged,
            Self::Died { .. } => EventType::Died,
            Self::HitFeedback { .. } => EventType::HitFeedback,
            Self::Retired { .. } => EventType::Retired,
        }
    }

    /// Returns the actor the event is about
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        match self {
            Self::HealthChanged { actor, .. }
            | Self::Died { actor, .. }
            | Self::HitFeedback { actor, .. }
            | Self::Retired { actor } => *actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = ActorEvent::Died {
            actor: ActorId(1),
            source: ActorId(2),
            killer: None,
            kind: DamageKind::ByEnvironment,
        };
        assert_eq!(event.event_type(), EventType::Died);
        assert_eq!(event.actor(), ActorId(1));
    }
}
