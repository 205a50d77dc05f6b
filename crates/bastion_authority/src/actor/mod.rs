//! # Actors
//!
//! Authoritative per-actor health records and the table that owns them.

mod hooks;
mod state;
mod table;

pub use hooks::{ActorHooks, NoHooks};
pub use state::{ActorState, DamageOutcome};
pub use table::{ActorSpec, ActorTable};
