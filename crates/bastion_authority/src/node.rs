//! # Authority Node
//!
//! One per process. Composes the router, the actor table (host side), the
//! replica cache (client side) and the observer hub.
//!
//! ## Damage Flow
//!
//! ```text
//! CLIENT                                    HOST
//!   │ request_damage()                        │
//!   │──── WireMessage::Damage ───────────────►│ apply:
//!   │                                         │   clamp health, record attacker
//!   │                                         │   death latch (once per life)
//!   │◄─── HealthChanged / ActorDied (all) ────│
//!   │◄─── DamageFeedback (owner only) ────────│
//! ```
//!
//! Every operation runs synchronously inside the caller's tick. Nothing here
//! blocks or waits on the network.

use std::sync::Arc;
use std::time::Duration;

use bastion_shared::{
    sanitize_amount, ActorEvent, ActorId, BodyPart, DamageKind, DamageRequest, EntityHandle,
    HealthSnapshot, ProcessId, WireMessage,
};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::actor::{ActorSpec, ActorState, ActorTable};
use crate::attacker::{self, AttackerLookup};
use crate::config::AuthorityConfig;
use crate::error::{AuthorityError, AuthorityResult};
use crate::feedback::{self, FeedbackOutcome};
use crate::observer::{ObserverHub, SubscriptionId};
use crate::replica::{Replica, ReplicaCache};
use crate::router::{DamageRouter, RouteDecision, RouteOutcome};
use crate::transport::{AuthorityContext, Inbox};

/// Authority state of one process.
pub struct AuthorityNode {
    context: AuthorityContext,
    config: AuthorityConfig,
    router: DamageRouter,
    actors: ActorTable,
    replicas: ReplicaCache,
    observers: ObserverHub,
}

impl AuthorityNode {
    /// Creates a node for the process described by `context`.
    #[must_use]
    pub fn new(context: AuthorityContext, config: AuthorityConfig) -> Self {
        let router = DamageRouter::new(&context);
        Self {
            context,
            config,
            router,
            actors: ActorTable::new(),
            replicas: ReplicaCache::new(),
            observers: ObserverHub::new(),
        }
    }

    /// Local process id.
    #[must_use]
    pub fn process(&self) -> ProcessId {
        self.context.process
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Whether this process may mutate `actor`.
    #[must_use]
    pub fn is_authoritative(&self, actor: ActorId) -> bool {
        self.context.oracle.is_authoritative(actor)
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Registers a callback for local events.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&ActorEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Registers a channel for local events.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<ActorEvent>) {
        self.observers.subscribe_channel()
    }

    /// Removes a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // =========================================================================
    // Lifecycle (host only)
    // =========================================================================

    /// Spawns an actor under this host's authority.
    pub fn spawn_actor(&mut self, spec: ActorSpec) -> AuthorityResult<HealthSnapshot> {
        self.require_authority(spec.id)?;

        let snapshot = self
            .actors
            .spawn(spec, self.config.default_max_health)?
            .snapshot();
        info!(
            "spawned {} ({}/{})",
            snapshot.actor_id(),
            snapshot.health,
            snapshot.max_health
        );

        self.publish_health(snapshot);
        Ok(snapshot)
    }

    /// Removes an actor from the world.
    pub fn retire_actor(&mut self, actor: ActorId) -> AuthorityResult<()> {
        self.require_authority(actor)?;
        self.actors
            .retire(actor)
            .ok_or(AuthorityError::UnknownActor(actor))?;
        info!("retired {}", actor);

        self.observers.publish(&ActorEvent::Retired { actor });
        self.context
            .transport
            .broadcast(WireMessage::ActorRetired { actor });
        Ok(())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Requests damage on an actor.
    ///
    /// Applied immediately on the host; forwarded (fire-and-forget) from
    /// anywhere else. Negative or NaN amounts count as zero.
    pub fn request_damage(
        &mut self,
        actor: ActorId,
        amount: f32,
        source: ActorId,
        kind: DamageKind,
    ) -> RouteOutcome {
        let request = DamageRequest::new(actor, amount, source, kind);
        match self.router.decide(actor) {
            RouteDecision::Local => self.apply(request),
            RouteDecision::Forward(host) => {
                self.router.forward(host, request);
                RouteOutcome::Forwarded(host)
            }
        }
    }

    /// Requests damage on one hit zone of an actor.
    ///
    /// The zone multiplier is applied here, then the request is routed like
    /// any other.
    pub fn request_part_damage(
        &mut self,
        actor: ActorId,
        part: BodyPart,
        amount: f32,
        source: ActorId,
        kind: DamageKind,
    ) -> RouteOutcome {
        let scaled = sanitize_amount(amount) * self.config.body_parts.multiplier(part);
        self.request_damage(actor, scaled, source, kind)
    }

    /// Heals an actor. Host only; never revives a dead actor.
    ///
    /// Returns the new health value.
    pub fn heal(&mut self, actor: ActorId, amount: f32) -> AuthorityResult<f32> {
        self.require_authority(actor)?;

        let state = self
            .actors
            .get_mut(actor)
            .ok_or(AuthorityError::UnknownActor(actor))?;
        let changed = state.heal(amount);
        let snapshot = state.snapshot();

        if changed {
            self.publish_health(snapshot);
        }
        Ok(snapshot.health)
    }

    /// Advances per-actor timers by `elapsed` and runs regeneration.
    ///
    /// Returns how many actors regenerated this step. A no-op on processes
    /// that own no actors.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let dt = elapsed.as_secs_f32();
        let regen = self.config.regen;
        let oracle = Arc::clone(&self.context.oracle);

        let mut changed = Vec::new();
        for state in self.actors.iter_mut() {
            if !oracle.is_authoritative(state.id()) {
                continue;
            }
            if state.regenerate(dt, &regen) {
                changed.push(state.snapshot());
            }
        }

        for snapshot in &changed {
            self.publish_health(*snapshot);
        }
        changed.len()
    }

    // =========================================================================
    // Queries (any process)
    // =========================================================================

    /// Current health (host) or last-known health (elsewhere).
    #[must_use]
    pub fn health(&self, actor: ActorId) -> Option<f32> {
        self.actors
            .get(actor)
            .map(ActorState::health)
            .or_else(|| self.replicas.get(actor).map(|r| r.health))
    }

    /// Max health (host) or last-known max health (elsewhere).
    #[must_use]
    pub fn max_health(&self, actor: ActorId) -> Option<f32> {
        self.actors
            .get(actor)
            .map(ActorState::max_health)
            .or_else(|| self.replicas.get(actor).map(|r| r.max_health))
    }

    /// Whether the actor is dead, as far as this process knows.
    #[must_use]
    pub fn is_dead(&self, actor: ActorId) -> Option<bool> {
        self.actors
            .get(actor)
            .map(ActorState::is_dead)
            .or_else(|| self.replicas.get(actor).map(Replica::is_dead))
    }

    /// Authoritative record, if this process owns the actor.
    #[must_use]
    pub fn actor(&self, actor: ActorId) -> Option<&ActorState> {
        self.actors.get(actor)
    }

    /// Replica, if this process tracks the actor remotely.
    #[must_use]
    pub fn replica(&self, actor: ActorId) -> Option<&Replica> {
        self.replicas.get(actor)
    }

    /// Number of actors owned by this process.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Most recent attacker of an owned actor, resolved now.
    ///
    /// `None` if nobody hit it yet or the attacker no longer exists.
    #[must_use]
    pub fn last_attacker(&self, actor: ActorId) -> Option<EntityHandle> {
        let source = self.actors.get(actor)?.last_attacker_id()?;
        attacker::resolve(&*self.context.directory, source)
    }

    // =========================================================================
    // Inbound messages
    // =========================================================================

    /// Handles one message from another process.
    pub fn handle_message(&mut self, from: ProcessId, message: WireMessage) {
        match message {
            WireMessage::Damage(request) => {
                if self.is_authoritative(request.target) {
                    self.apply(request);
                } else {
                    warn!(
                        "{} sent damage for {} to a non-authoritative process; dropped",
                        from, request.target
                    );
                }
            }
            WireMessage::HealthChanged(snapshot) => {
                let actor = snapshot.actor_id();
                if !self.accepts_replication(from, actor, "health update") {
                    return;
                }
                if self.replicas.apply_snapshot(snapshot) {
                    self.observers.publish(&ActorEvent::HealthChanged {
                        actor,
                        health: snapshot.health,
                    });
                }
            }
            WireMessage::ActorDied { actor, source, kind } => {
                if !self.accepts_replication(from, actor, "death") {
                    return;
                }
                if self.replicas.mark_died(actor) {
                    let killer = attacker::resolve(&*self.context.directory, source);
                    self.observers.publish(&ActorEvent::Died {
                        actor,
                        source,
                        killer,
                        kind,
                    });
                }
            }
            WireMessage::DamageFeedback { actor, source, kind } => {
                if !self.accepts_replication(from, actor, "hit feedback") {
                    return;
                }
                let attacker = attacker::resolve(&*self.context.directory, source);
                self.observers.publish(&ActorEvent::HitFeedback {
                    actor,
                    source,
                    attacker,
                    kind,
                });
            }
            WireMessage::ActorRetired { actor } => {
                if !self.accepts_replication(from, actor, "retirement") {
                    return;
                }
                self.replicas.remove(actor);
                self.observers.publish(&ActorEvent::Retired { actor });
            }
        }
    }

    /// Handles every pending message in `inbox`. Returns how many.
    pub fn drain(&mut self, inbox: &Inbox) -> usize {
        let pending = inbox.drain();
        let count = pending.len();
        for envelope in pending {
            self.handle_message(envelope.from, envelope.message);
        }
        count
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require_authority(&self, actor: ActorId) -> AuthorityResult<()> {
        if self.is_authoritative(actor) {
            Ok(())
        } else {
            Err(AuthorityError::NotAuthoritative { actor })
        }
    }

    /// Host-to-client traffic is only trusted from the actor's host, and
    /// never on the host itself.
    fn accepts_replication(&self, from: ProcessId, actor: ActorId, what: &str) -> bool {
        if self.is_authoritative(actor) {
            debug!("ignoring {} for owned {} from {}", what, actor, from);
            return false;
        }
        let host = self.context.oracle.host_of(actor);
        if from != host {
            warn!("{} for {} from {} dropped: {} is the host", what, actor, from, host);
            return false;
        }
        true
    }

    fn publish_health(&mut self, snapshot: HealthSnapshot) {
        self.observers.publish(&ActorEvent::HealthChanged {
            actor: snapshot.actor_id(),
            health: snapshot.health,
        });
        self.context
            .transport
            .broadcast(WireMessage::HealthChanged(snapshot));
    }

    /// Applies a request on the host. Caller has checked authority.
    fn apply(&mut self, request: DamageRequest) -> RouteOutcome {
        let directory = Arc::clone(&self.context.directory);

        let Some(state) = self.actors.get_mut(request.target) else {
            warn!("damage on {} dropped: not spawned here", request.target);
            return RouteOutcome::Dropped;
        };

        // One attacker lookup per application, shared by bookkeeping and feedback
        let mut attacker = AttackerLookup::new(&*directory, request.source);
        let outcome = state.apply_damage(&request, attacker.get());
        let snapshot = state.snapshot();

        if outcome.changed() {
            self.publish_health(snapshot);
        }

        if outcome.died {
            info!(
                "{} died ({:?} by {}{})",
                request.target,
                request.kind,
                request.source,
                if outcome.attacker.is_some() { "" } else { ", unresolved" }
            );
            self.observers.publish(&ActorEvent::Died {
                actor: request.target,
                source: request.source,
                killer: outcome.attacker,
                kind: request.kind,
            });
            self.context.transport.broadcast(WireMessage::ActorDied {
                actor: request.target,
                source: request.source,
                kind: request.kind,
            });
            if let Some(state) = self.actors.get_mut(request.target) {
                state.finish_death(outcome.attacker.as_ref(), request.kind);
            }
        }

        let delivery = feedback::notify_owner(
            &*directory,
            &*self.context.transport,
            self.context.process,
            &request,
        );
        if delivery == FeedbackOutcome::Local {
            self.observers.publish(&ActorEvent::HitFeedback {
                actor: request.target,
                source: request.source,
                attacker: attacker.get(),
                kind: request.kind,
            });
        }

        RouteOutcome::Applied(outcome)
    }
}
