//! Damage vocabulary.
//!
//! A damage request is transient: it is routed, applied (or forwarded) and
//! dropped. Only its effects on actor state are kept.

use crate::ids::ActorId;
use serde::{Deserialize, Serialize};

/// Classification of where damage came from.
///
/// Carries no behaviour in the authority model; it is preserved end-to-end so
/// observers (kill feed, hit indicators, AI) can react to it.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Dealt by a player.
    ByPlayer = 0,
    /// Dealt by an AI-controlled actor.
    ByAi = 1,
    /// Dealt by the world (falls, fire, hazards).
    ByEnvironment = 2,
    /// Anything else.
    ByOther = 3,
}

/// Hit zone on an actor's body.
///
/// A hit on a zone is forwarded to the owning actor with the zone's
/// multiplier applied.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    /// Head.
    Head = 0,
    /// Chest and abdomen.
    Torso = 1,
    /// Arms and legs.
    Limbs = 2,
}

/// A request to damage one actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageRequest {
    /// Actor that takes the damage.
    pub target: ActorId,
    /// Damage amount, already sanitized.
    pub amount: f32,
    /// Attacking entity. Resolved lazily and may be stale.
    pub source: ActorId,
    /// Damage classification.
    pub kind: DamageKind,
}

impl DamageRequest {
    /// Creates a request, clamping the amount to a usable value.
    #[must_use]
    pub fn new(target: ActorId, amount: f32, source: ActorId, kind: DamageKind) -> Self {
        Self {
            target,
            amount: sanitize_amount(amount),
            source,
            kind,
        }
    }
}

/// Clamps a gameplay-facing amount: negative and NaN become zero.
///
/// Positive infinity passes through; it saturates health at zero when applied.
#[inline]
#[must_use]
pub fn sanitize_amount(amount: f32) -> f32 {
    if amount.is_nan() || amount < 0.0 {
        0.0
    } else {
        amount
    }
}
