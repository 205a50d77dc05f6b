//! Authoritative actor table.
//!
//! Only the host fills this table. Client nodes keep replicas instead.

use std::collections::HashMap;

use bastion_shared::ActorId;

use super::hooks::{ActorHooks, NoHooks};
use super::state::ActorState;
use crate::error::{AuthorityError, AuthorityResult};

/// Parameters for spawning an actor.
pub struct ActorSpec {
    /// Network-wide id.
    pub id: ActorId,
    /// Max health. `None` uses the configured default.
    pub max_health: Option<f32>,
    /// Starting health. `None` starts at max health.
    pub starting_health: Option<f32>,
    /// Per-actor behaviour.
    pub hooks: Box<dyn ActorHooks>,
}

impl ActorSpec {
    /// Spec with default health and no hooks.
    #[must_use]
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            max_health: None,
            starting_health: None,
            hooks: Box::new(NoHooks),
        }
    }

    /// Sets max health.
    #[must_use]
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = Some(max_health);
        self
    }

    /// Sets a starting value (e.g. restored from persistence). Must be
    /// positive; values above max health are capped.
    #[must_use]
    pub fn with_starting_health(mut self, health: f32) -> Self {
        self.starting_health = Some(health);
        self
    }

    /// Sets the behaviour hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl ActorHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }
}

/// Live actors owned by this process.
#[derive(Debug, Default)]
pub struct ActorTable {
    actors: HashMap<ActorId, ActorState>,
}

impl ActorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new actor.
    pub fn spawn(
        &mut self,
        spec: ActorSpec,
        default_max_health: f32,
    ) -> AuthorityResult<&ActorState> {
        let max_health = spec.max_health.unwrap_or(default_max_health);
        if !max_health.is_finite() || max_health <= 0.0 {
            return Err(AuthorityError::InvalidMaxHealth {
                actor: spec.id,
                max_health,
            });
        }
        if self.actors.contains_key(&spec.id) {
            return Err(AuthorityError::DuplicateActor(spec.id));
        }

        let health = spec.starting_health.unwrap_or(max_health);
        // An actor cannot enter the world already dead
        if health.is_nan() || health <= 0.0 {
            return Err(AuthorityError::InvalidStartingHealth {
                actor: spec.id,
                health,
            });
        }
        let state = ActorState::new(spec.id, max_health, health, spec.hooks);
        Ok(self.actors.entry(spec.id).or_insert(state))
    }

    /// Removes an actor, returning its final state.
    pub fn retire(&mut self, id: ActorId) -> Option<ActorState> {
        self.actors.remove(&id)
    }

    /// Read access.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActorState> {
        self.actors.values_mut()
    }

    /// Whether an actor is live here.
    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
