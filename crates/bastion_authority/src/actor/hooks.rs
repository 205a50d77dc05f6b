//! Per-actor behaviour hooks.
//!
//! Player, enemy and destructible actors react differently to damage. Instead
//! of subclassing, each actor is spawned with a strategy object implementing
//! [`ActorHooks`]. Every method has an empty default.

use bastion_shared::{ActorId, DamageKind, DamageRequest, EntityHandle};

/// Strategy object invoked by the host while it mutates an actor.
///
/// Hooks run on the authoritative host only, inside the apply step.
pub trait ActorHooks: Send {
    /// Damage was applied. `health` is the clamped post-damage value.
    fn on_take_damage(
        &mut self,
        _actor: ActorId,
        _request: &DamageRequest,
        _attacker: Option<&EntityHandle>,
        _health: f32,
    ) {
    }

    /// A heal (or regeneration step) was applied.
    fn on_heal(&mut self, _actor: ActorId, _amount: f32, _health: f32) {}

    /// The actor died. Called once per life, after observers were notified.
    fn on_death(&mut self, _actor: ActorId, _killer: Option<&EntityHandle>, _kind: DamageKind) {}
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl ActorHooks for NoHooks {}
