//! # Authority Scenario Tests
//!
//! Host and client nodes wired over the loopback transport, walking one actor
//! through a life:
//!
//! 1. **A**: a hit lands and the attacker is recorded
//! 2. **B**: a lethal hit clamps to zero and kills exactly once
//! 3. **C**: overkill changes nothing
//! 4. **D**: healing a dead actor restores health, not life
//! 5. **E**: an unknown source still deals damage
//!
//! Run with: cargo test --package bastion_authority --test authority_scenarios

use std::sync::Arc;

use bastion_authority::{
    ActorSpec, AuthorityConfig, AuthorityContext, AuthorityNode, Inbox, LoopbackHub,
    RouteOutcome, SharedDirectory, StaticAuthority,
};
use bastion_shared::{
    ActorEvent, ActorId, DamageKind, EntityClass, EntityHandle, EventType, ProcessId,
};
use crossbeam_channel::Receiver;

const HOST: ProcessId = ProcessId(0);
const OWNER: ProcessId = ProcessId(1);

const TARGET: ActorId = ActorId(1);
const S1: ActorId = ActorId(101);
const S2: ActorId = ActorId(102);
const S3: ActorId = ActorId(103);

struct Side {
    node: AuthorityNode,
    inbox: Inbox,
    events: Receiver<ActorEvent>,
}

struct Session {
    host: Side,
    owner: Side,
    directory: SharedDirectory,
}

fn side(hub: &LoopbackHub, directory: &SharedDirectory, process: ProcessId) -> Side {
    let (transport, inbox) = hub.connect(process);
    let context = AuthorityContext::new(
        process,
        Arc::new(StaticAuthority::client(process, HOST)),
        Arc::new(directory.clone()),
        Arc::new(transport),
    );
    let mut node = AuthorityNode::new(context, AuthorityConfig::default());
    let (_, events) = node.subscribe_channel();
    Side {
        node,
        inbox,
        events,
    }
}

impl Session {
    fn new() -> Self {
        let hub = LoopbackHub::new();
        let directory = SharedDirectory::new();
        let mut session = Self {
            host: side(&hub, &directory, HOST),
            owner: side(&hub, &directory, OWNER),
            directory,
        };

        session
            .directory
            .register(EntityHandle::owned_by(TARGET, EntityClass::Player, OWNER));
        for source in [S1, S2, S3] {
            session
                .directory
                .register(EntityHandle::unowned(source, EntityClass::Ai));
        }
        session
            .host
            .node
            .spawn_actor(ActorSpec::new(TARGET))
            .expect("spawn on host");
        session.pump();
        session
    }

    fn pump(&mut self) {
        while self.host.node.drain(&self.host.inbox) + self.owner.node.drain(&self.owner.inbox) > 0
        {}
    }

    fn hit(&mut self, amount: f32, source: ActorId) {
        // Damage is requested from the owning client, as a player would
        let routed = self
            .owner
            .node
            .request_damage(TARGET, amount, source, DamageKind::ByPlayer);
        assert_eq!(routed, RouteOutcome::Forwarded(HOST));
        self.pump();
    }
}

fn drain(events: &Receiver<ActorEvent>) -> Vec<ActorEvent> {
    events.try_iter().collect()
}

fn deaths(events: &[ActorEvent]) -> Vec<ActorEvent> {
    events
        .iter()
        .filter(|e| e.event_type() == EventType::Died)
        .copied()
        .collect()
}

// ============================================================================
// SCENARIOS A-D: ONE LIFE
// ============================================================================

#[test]
fn verify_full_life_cycle() {
    let mut session = Session::new();
    drain(&session.host.events);
    drain(&session.owner.events);

    // A: 100 - 30 from S1
    session.hit(30.0, S1);
    assert_eq!(session.host.node.health(TARGET), Some(70.0));
    assert_eq!(session.owner.node.health(TARGET), Some(70.0));
    assert_eq!(session.host.node.is_dead(TARGET), Some(false));
    assert_eq!(session.host.node.last_attacker(TARGET).map(|h| h.id), Some(S1));
    assert!(deaths(&drain(&session.host.events)).is_empty());
    let owner_events = drain(&session.owner.events);
    assert!(deaths(&owner_events).is_empty());
    assert!(owner_events
        .iter()
        .any(|e| matches!(e, ActorEvent::HitFeedback { source, .. } if *source == S1)));

    // B: 80 from S2 clamps to zero and kills
    session.hit(80.0, S2);
    assert_eq!(session.host.node.health(TARGET), Some(0.0));
    assert_eq!(session.host.node.last_attacker(TARGET).map(|h| h.id), Some(S2));
    for events in [drain(&session.host.events), drain(&session.owner.events)] {
        let died = deaths(&events);
        assert_eq!(died.len(), 1);
        match died[0] {
            ActorEvent::Died { killer, source, .. } => {
                assert_eq!(source, S2);
                assert_eq!(killer.map(|h| h.id), Some(S2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    // C: overkill from S3
    session.hit(50.0, S3);
    assert_eq!(session.host.node.health(TARGET), Some(0.0));
    assert_eq!(session.owner.node.health(TARGET), Some(0.0));
    assert!(deaths(&drain(&session.host.events)).is_empty());
    assert!(deaths(&drain(&session.owner.events)).is_empty());

    // D: heal 20, still dead
    assert_eq!(session.host.node.heal(TARGET, 20.0), Ok(20.0));
    session.pump();
    assert_eq!(session.host.node.health(TARGET), Some(20.0));
    assert_eq!(session.owner.node.health(TARGET), Some(20.0));
    assert_eq!(session.host.node.is_dead(TARGET), Some(true));
    assert_eq!(session.owner.node.is_dead(TARGET), Some(true));
    assert!(session
        .host
        .node
        .actor(TARGET)
        .is_some_and(|state| state.death_notified()));

    // Still no resurrection, and no second death
    session.hit(40.0, S1);
    assert_eq!(session.host.node.health(TARGET), Some(0.0));
    assert!(deaths(&drain(&session.host.events)).is_empty());
    assert!(deaths(&drain(&session.owner.events)).is_empty());
}

// ============================================================================
// SCENARIO E: UNKNOWN SOURCE
// ============================================================================

#[test]
fn verify_unregistered_source_still_damages() {
    let mut session = Session::new();
    let ghost = ActorId(9_999);

    session.hit(25.0, ghost);

    assert_eq!(session.host.node.health(TARGET), Some(75.0));
    assert_eq!(session.owner.node.health(TARGET), Some(75.0));
    assert!(session.host.node.last_attacker(TARGET).is_none());
    assert_eq!(
        session
            .host
            .node
            .actor(TARGET)
            .and_then(|state| state.last_attacker_id()),
        Some(ghost)
    );

    let feedback = drain(&session.owner.events)
        .into_iter()
        .find(|e| e.event_type() == EventType::HitFeedback);
    match feedback {
        Some(ActorEvent::HitFeedback { attacker, source, .. }) => {
            assert_eq!(source, ghost);
            assert!(attacker.is_none());
        }
        other => panic!("expected hit feedback, got {:?}", other),
    }
}

#[test]
fn verify_attacker_destroyed_before_apply() {
    let mut session = Session::new();

    // Request is in flight when the attacker disappears
    session
        .owner
        .node
        .request_damage(TARGET, 100.0, S1, DamageKind::ByPlayer);
    session.directory.remove(S1);
    session.pump();

    assert_eq!(session.host.node.health(TARGET), Some(0.0));
    let died = deaths(&drain(&session.host.events));
    assert_eq!(died.len(), 1);
    assert!(matches!(died[0], ActorEvent::Died { killer: None, .. }));
}

#[test]
fn verify_retired_actor_drops_requests() {
    let mut session = Session::new();

    session.host.node.retire_actor(TARGET).expect("retire on host");
    session.pump();
    assert!(session.owner.node.health(TARGET).is_none());
    assert!(drain(&session.owner.events)
        .iter()
        .any(|e| e.event_type() == EventType::Retired));

    session.hit(10.0, S1);
    assert!(session.host.node.health(TARGET).is_none());
    assert_eq!(
        session
            .host
            .node
            .request_damage(TARGET, 10.0, S1, DamageKind::ByAi),
        RouteOutcome::Dropped
    );
}
