//! # BASTION Authority - The Single Writer
//!
//! Authoritative health, damage and death arbitration for networked actors.
//!
//! ## Architecture
//!
//! - **Actor State**: ground-truth health, owned by exactly one host process
//! - **Damage Router**: the only entry point for damage; applies or forwards
//! - **Death Latch**: one death notification per life, no matter what arrives
//! - **Attacker Resolution**: advisory, a stale id is a normal outcome
//! - **Client Feedback**: directed "you were hit" to the owning client only
//! - **Observers**: callback and channel subscribers with explicit handles
//!
//! ## Authority Model
//!
//! ```text
//! CLIENT                           HOST
//!   |                                 |
//!   |--- Damage(actor, amt, src) ---->|  <- only the host writes health
//!   |                                 |
//!   |<-- HealthChanged / ActorDied ---|  (broadcast)
//!   |<-- DamageFeedback --------------|  (owner only)
//!   |                                 |
//! ```
//!
//! Nothing on the damage path returns a hard error. Bad amounts are clamped,
//! stale attackers resolve to `None`, requests for missing actors are dropped
//! with a warning. Only lifecycle calls made on the wrong process fail, with
//! [`AuthorityError::NotAuthoritative`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bastion_authority::{AuthorityConfig, AuthorityContext, AuthorityNode, ActorSpec};
//!
//! let context = AuthorityContext::new(process, oracle, directory, transport);
//! let mut node = AuthorityNode::new(context, AuthorityConfig::default());
//! node.spawn_actor(ActorSpec::new(ActorId(1)))?;
//! node.request_damage(ActorId(1), 30.0, ActorId(2), DamageKind::ByPlayer);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod actor;
pub mod attacker;
pub mod config;
pub mod death;
pub mod drill;
pub mod error;
pub mod feedback;
pub mod node;
pub mod observer;
pub mod replica;
pub mod router;
pub mod tick;
pub mod transport;

pub use actor::{ActorHooks, ActorSpec, ActorState, ActorTable, DamageOutcome, NoHooks};
pub use attacker::AttackerLookup;
pub use config::{AuthorityConfig, BodyPartMultipliers, RegenConfig};
pub use death::{DeathLatch, LifeState};
pub use drill::{DamageDrill, DrillResult};
pub use error::{AuthorityError, AuthorityResult, ConfigError, ConfigResult};
pub use feedback::FeedbackOutcome;
pub use node::AuthorityNode;
pub use observer::{ObserverHub, SubscriptionId};
pub use replica::{Replica, ReplicaCache};
pub use router::{DamageRouter, RouteDecision, RouteOutcome};
pub use tick::{Clock, ManualClock, SystemClock, TickLoop, TickStats};
pub use transport::{
    AuthorityContext, AuthorityOracle, EntityDirectory, Envelope, Inbox, LoopbackHub,
    LoopbackStats, LoopbackTransport, Outgoing, RecordingTransport, SharedDirectory,
    StaticAuthority, Transport,
};
