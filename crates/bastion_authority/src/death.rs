//! # Death Arbitration
//!
//! One-shot latch guaranteeing a single death notification per actor life.
//!
//! ```text
//!   Alive ──(health <= 0)──► Dying ──(notifications sent)──► Dead
//!                              │                              │
//!                              └─── further hits: no-op ──────┘
//! ```
//!
//! `Dying` lasts only for the apply step that crossed zero. It exists so that
//! anything re-entering the actor while observers are being notified sees the
//! latch already set. There is no way back to `Alive`.

/// Life state of an actor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifeState {
    /// Health above zero, death not announced.
    #[default]
    Alive = 0,
    /// Death decided, notifications in flight.
    Dying = 1,
    /// Death announced. Terminal.
    Dead = 2,
}

/// Host-local one-shot latch. Never replicated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeathLatch {
    state: LifeState,
}

impl DeathLatch {
    /// Creates a latch for a living actor.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: LifeState::Alive }
    }

    /// Current life state.
    #[must_use]
    pub const fn state(&self) -> LifeState {
        self.state
    }

    /// Whether the death transition has fired.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self.state, LifeState::Alive)
    }

    /// Checks post-damage health against the latch.
    ///
    /// Returns `true` exactly once: the first time it sees `health <= 0`.
    /// The latch is left in `Dying` until [`DeathLatch::settle`] is called.
    pub fn arbitrate(&mut self, health: f32) -> bool {
        if health > 0.0 || self.is_set() {
            return false;
        }
        self.state = LifeState::Dying;
        true
    }

    /// Completes a transition started by [`DeathLatch::arbitrate`].
    pub fn settle(&mut self) {
        if self.state == LifeState::Dying {
            self.state = LifeState::Dead;
        }
    }
}
