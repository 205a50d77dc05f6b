//! # Actor State
//!
//! The authoritative health record of one actor.
//!
//! Reads are public. Every mutator is crate-private: the only way to change
//! health from outside this crate is through an [`AuthorityNode`], which
//! checks authority first.
//!
//! [`AuthorityNode`]: crate::node::AuthorityNode

use std::fmt;

use bastion_shared::{
    sanitize_amount, ActorId, DamageKind, DamageRequest, EntityHandle, HealthSnapshot,
};

use super::hooks::ActorHooks;
use crate::config::RegenConfig;
use crate::death::{DeathLatch, LifeState};

/// Result of applying one damage request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    /// Health before the request.
    pub previous: f32,
    /// Health after the request (clamped).
    pub health: f32,
    /// Whether this request fired the death transition.
    pub died: bool,
    /// Attacker as resolved for this application.
    pub attacker: Option<EntityHandle>,
}

impl DamageOutcome {
    /// Whether the stored health value changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.health != self.previous
    }

    /// Health actually removed (after clamping).
    #[must_use]
    pub fn applied(&self) -> f32 {
        self.previous - self.health
    }
}

/// Authoritative health record.
pub struct ActorState {
    id: ActorId,
    health: f32,
    max_health: f32,
    latch: DeathLatch,
    /// Advisory. Only the id is kept; resolve it when needed.
    last_attacker: Option<ActorId>,
    /// Seconds since the last damage request landed.
    since_damage: f32,
    hooks: Box<dyn ActorHooks>,
}

impl ActorState {
    /// Callers validate that both values are positive; `health` is capped
    /// at `max_health` here.
    pub(crate) fn new(
        id: ActorId,
        max_health: f32,
        health: f32,
        hooks: Box<dyn ActorHooks>,
    ) -> Self {
        Self {
            id,
            health: health.min(max_health),
            max_health,
            latch: DeathLatch::new(),
            last_attacker: None,
            since_damage: 0.0,
            hooks,
        }
    }

    /// Actor id.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Whether the actor is dead.
    ///
    /// Once the death latch is set the actor stays dead, even if healing has
    /// since pushed health above zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0 || self.latch.is_set()
    }

    /// Whether the death notification has fired for this life.
    #[must_use]
    pub const fn death_notified(&self) -> bool {
        self.latch.is_set()
    }

    /// Life state of the death latch.
    #[must_use]
    pub const fn life_state(&self) -> LifeState {
        self.latch.state()
    }

    /// Id of the most recent attacker, unresolved.
    #[must_use]
    pub const fn last_attacker_id(&self) -> Option<ActorId> {
        self.last_attacker
    }

    /// Replicated view of this record.
    #[must_use]
    pub const fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot::new(self.id, self.health, self.max_health, self.latch.is_set())
    }

    pub(crate) fn apply_damage(
        &mut self,
        request: &DamageRequest,
        attacker: Option<EntityHandle>,
    ) -> DamageOutcome {
        let previous = self.health;
        let amount = sanitize_amount(request.amount);

        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.last_attacker = Some(request.source);
        self.since_damage = 0.0;

        let died = self.latch.arbitrate(self.health);
        self.hooks
            .on_take_damage(self.id, request, attacker.as_ref(), self.health);

        DamageOutcome {
            previous,
            health: self.health,
            died,
            attacker,
        }
    }

    /// Runs the death hook and settles the latch. No-op unless `Dying`.
    pub(crate) fn finish_death(&mut self, killer: Option<&EntityHandle>, kind: DamageKind) {
        if self.latch.state() != LifeState::Dying {
            return;
        }
        self.hooks.on_death(self.id, killer, kind);
        self.latch.settle();
    }

    /// Returns whether the stored value changed. Never touches the latch.
    pub(crate) fn heal(&mut self, amount: f32) -> bool {
        let previous = self.health;
        self.health = (self.health + sanitize_amount(amount)).min(self.max_health);

        let changed = self.health != previous;
        if changed {
            self.hooks.on_heal(self.id, self.health - previous, self.health);
        }
        changed
    }

    /// Advances the out-of-combat timer and regenerates if due.
    pub(crate) fn regenerate(&mut self, dt: f32, regen: &RegenConfig) -> bool {
        self.since_damage += dt;

        if !regen.enabled || self.is_dead() || self.health >= self.max_health {
            return false;
        }
        if self.since_damage < regen.delay_seconds {
            return false;
        }

        // Only the part of this step past the delay counts
        let active = (self.since_damage - regen.delay_seconds).min(dt);
        self.heal(regen.rate_per_second * active)
    }
}

impl fmt::Debug for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorState")
            .field("id", &self.id)
            .field("health", &self.health)
            .field("max_health", &self.max_health)
            .field("latch", &self.latch)
            .field("last_attacker", &self.last_attacker)
            .finish_non_exhaustive()
    }
}
