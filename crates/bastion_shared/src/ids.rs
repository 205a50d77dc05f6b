//! Identifiers that cross process boundaries.
//!
//! Nothing here is a pointer. Cross-entity references are always ids that the
//! receiving process resolves against its own entity directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network-wide unique identifier of an actor (or any spawned entity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Identifier of a participating process (the host or one client).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process#{}", self.0)
    }
}

/// Broad class of a spawned entity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    /// Player-controlled character.
    Player = 0,
    /// AI-controlled character.
    Ai = 1,
    /// World hazard (fire, fall, explosive barrel).
    Environment = 2,
    /// Anything else.
    #[default]
    Other = 3,
}

/// A resolved, live entity as reported by the entity directory.
///
/// Handles are snapshots: holding one does not keep the entity alive, and the
/// same id may stop resolving on the next lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHandle {
    /// Entity id.
    pub id: ActorId,
    /// Entity class.
    pub class: EntityClass,
    /// Client process that owns (controls) the entity, if any.
    pub owner: Option<ProcessId>,
}

impl EntityHandle {
    /// Creates a handle with no owning client.
    #[must_use]
    pub const fn unowned(id: ActorId, class: EntityClass) -> Self {
        Self { id, class, owner: None }
    }

    /// Creates a handle owned by a client process.
    #[must_use]
    pub const fn owned_by(id: ActorId, class: EntityClass, owner: ProcessId) -> Self {
        Self { id, class, owner: Some(owner) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ActorId(7).to_string(), "actor#7");
        assert_eq!(ProcessId(2).to_string(), "process#2");
    }

    #[test]
    fn test_handle_constructors() {
        let ai = EntityHandle::unowned(ActorId(3), EntityClass::Ai);
        assert!(ai.owner.is_none());

        let player = EntityHandle::owned_by(ActorId(4), EntityClass::Player, ProcessId(1));
        assert_eq!(player.owner, Some(ProcessId(1)));
    }
}
