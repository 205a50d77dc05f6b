//! # BASTION Shared
//!
//! Common types used by both the authoritative host and client processes.
//!
//! ## CRITICAL RULE
//!
//! Everything in here must be meaningful on BOTH sides of the wire.
//! Anything that mutates health belongs in `bastion_authority`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod damage;
pub mod events;
pub mod ids;
pub mod protocol;

pub use constants::{DEFAULT_MAX_HEALTH, HOST_PROCESS, TICK_RATE};
pub use damage::{sanitize_amount, BodyPart, DamageKind, DamageRequest};
pub use events::{ActorEvent, EventType};
pub use ids::{ActorId, EntityClass, EntityHandle, ProcessId};
pub use protocol::{HealthSnapshot, WireMessage};
