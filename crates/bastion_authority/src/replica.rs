//! Last-known health of actors this process does not own.
//!
//! Replicas are eventually consistent copies fed by host broadcasts. Treat
//! them as "last known", never as "current".

use std::collections::HashMap;

use bastion_shared::{ActorId, HealthSnapshot};

/// Last-known state of a remote actor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Replica {
    /// Last replicated health.
    pub health: f32,
    /// Last replicated max health (0 until a snapshot arrives).
    pub max_health: f32,
    /// Host's death latch as of the last snapshot.
    pub dead: bool,
    /// Whether this process already raised the death event.
    pub death_announced: bool,
}

impl Replica {
    /// Whether the actor should be treated as dead locally.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead || self.death_announced || self.health <= 0.0
    }
}

/// Replicas keyed by actor.
#[derive(Debug, Default)]
pub struct ReplicaCache {
    replicas: HashMap<ActorId, Replica>,
}

impl ReplicaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot. Returns whether the health value changed (or the
    /// actor was not known before).
    pub fn apply_snapshot(&mut self, snapshot: HealthSnapshot) -> bool {
        let mut known = true;
        let replica = self.replicas.entry(snapshot.actor_id()).or_insert_with(|| {
            known = false;
            Replica::default()
        });

        let changed = !known || replica.health != snapshot.health;
        replica.health = snapshot.health;
        replica.max_health = snapshot.max_health;
        replica.dead |= snapshot.is_dead();
        changed
    }

    /// Records a death announcement. Returns `true` only the first time.
    pub fn mark_died(&mut self, actor: ActorId) -> bool {
        let replica = self.replicas.entry(actor).or_default();
        replica.dead = true;
        !std::mem::replace(&mut replica.death_announced, true)
    }

    /// Forgets an actor.
    pub fn remove(&mut self, actor: ActorId) -> Option<Replica> {
        self.replicas.remove(&actor)
    }

    /// Last-known state.
    #[must_use]
    pub fn get(&self, actor: ActorId) -> Option<&Replica> {
        self.replicas.get(&actor)
    }

    /// Number of tracked actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }
}
