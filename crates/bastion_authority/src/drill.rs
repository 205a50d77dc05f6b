//! # Damage Drill
//!
//! End-to-end exercise of the authority model over the loopback transport.
//!
//! ```text
//! process#0  host      owns every actor, applies all damage
//! process#1  client    controls actor#10 (player)
//! process#2  client    controls actor#20 (attacking player)
//!            (host)    actor#30 is an AI, actor#11 a fresh target
//! ```
//!
//! Each scenario issues requests from whichever process would issue them in a
//! real session, pumps every inbox until quiet, then checks host state,
//! replicas and observer events on all three processes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bastion_shared::{
    ActorEvent, ActorId, DamageKind, EntityClass, EntityHandle, EventType, ProcessId,
    HOST_PROCESS,
};
use crossbeam_channel::Receiver;

use crate::actor::ActorSpec;
use crate::config::AuthorityConfig;
use crate::node::AuthorityNode;
use crate::router::RouteOutcome;
use crate::tick::{ManualClock, TickLoop};
use crate::transport::{AuthorityContext, Inbox, LoopbackHub, SharedDirectory, StaticAuthority};

const PLAYER: ActorId = ActorId(10);
const FRESH: ActorId = ActorId(11);
const ATTACKER: ActorId = ActorId(20);
const AI: ActorId = ActorId(30);
const NEVER_SPAWNED: ActorId = ActorId(999);

const CLIENT_A: ProcessId = ProcessId(1);
const CLIENT_B: ProcessId = ProcessId(2);

/// Latency budget per scenario, in microseconds.
const TARGET_US: u64 = 50_000;

/// One process taking part in the drill.
struct Peer {
    node: AuthorityNode,
    inbox: Inbox,
    events: Receiver<ActorEvent>,
    seen: Vec<ActorEvent>,
}

impl Peer {
    fn connect(
        hub: &LoopbackHub,
        directory: &SharedDirectory,
        process: ProcessId,
        config: AuthorityConfig,
    ) -> Self {
        let (transport, inbox) = hub.connect(process);
        let context = AuthorityContext::new(
            process,
            Arc::new(StaticAuthority::client(process, HOST_PROCESS)),
            Arc::new(directory.clone()),
            Arc::new(transport),
        );
        let mut node = AuthorityNode::new(context, config);
        let (_, events) = node.subscribe_channel();
        Self {
            node,
            inbox,
            events,
            seen: Vec::new(),
        }
    }

    fn pump(&mut self) -> usize {
        let handled = self.node.drain(&self.inbox);
        self.seen.extend(self.events.try_iter());
        handled
    }

    fn count(&self, kind: EventType, actor: ActorId) -> usize {
        self.seen
            .iter()
            .filter(|e| e.event_type() == kind && e.actor() == actor)
            .count()
    }

    fn clear(&mut self) {
        self.seen.clear();
    }
}

/// A host and two clients sharing one entity directory.
struct Cluster {
    host: Peer,
    client_a: Peer,
    client_b: Peer,
    directory: SharedDirectory,
}

impl Cluster {
    fn new(config: AuthorityConfig) -> Self {
        let hub = LoopbackHub::new();
        let directory = SharedDirectory::new();

        let host = Peer::connect(&hub, &directory, HOST_PROCESS, config.clone());
        let client_a = Peer::connect(&hub, &directory, CLIENT_A, config.clone());
        let client_b = Peer::connect(&hub, &directory, CLIENT_B, config);

        directory.register(EntityHandle::owned_by(PLAYER, EntityClass::Player, CLIENT_A));
        directory.register(EntityHandle::owned_by(ATTACKER, EntityClass::Player, CLIENT_B));
        directory.register(EntityHandle::unowned(AI, EntityClass::Ai));
        directory.register(EntityHandle::unowned(FRESH, EntityClass::Other));

        let mut cluster = Self {
            host,
            client_a,
            client_b,
            directory,
        };
        for id in [PLAYER, ATTACKER, AI, FRESH] {
            if let Err(e) = cluster.host.node.spawn_actor(ActorSpec::new(id)) {
                tracing::warn!("drill: could not spawn {}: {}", id, e);
            }
        }
        cluster.settle();
        cluster
    }

    /// Pumps every inbox until nothing moves.
    fn settle(&mut self) {
        loop {
            let moved = self.host.pump() + self.client_a.pump() + self.client_b.pump();
            if moved == 0 {
                break;
            }
        }
    }

    fn clear(&mut self) {
        self.host.clear();
        self.client_a.clear();
        self.client_b.clear();
    }

    fn deaths(&self, actor: ActorId) -> [usize; 3] {
        [
            self.host.count(EventType::Died, actor),
            self.client_a.count(EventType::Died, actor),
            self.client_b.count(EventType::Died, actor),
        ]
    }
}

/// Result of one drill scenario.
#[derive(Clone, Debug)]
pub struct DrillResult {
    /// Scenario name.
    pub name: String,
    /// Whether every check held.
    pub passed: bool,
    /// Wall time from first request to quiet inboxes, in microseconds.
    pub latency_us: u64,
    /// Latency budget in microseconds.
    pub target_us: u64,
    /// Failed checks, or a summary when everything passed.
    pub details: String,
}

/// Scenario runner.
pub struct DamageDrill {
    results: Vec<DrillResult>,
}

impl DamageDrill {
    /// Creates a runner with no results.
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Runs every scenario.
    pub fn run_all(&mut self) {
        let mut cluster = Cluster::new(AuthorityConfig::default());
        self.scenario_forwarded_hit(&mut cluster);
        self.scenario_lethal_hit(&mut cluster);
        self.scenario_overkill(&mut cluster);
        self.scenario_heal_dead(&mut cluster);
        self.scenario_unknown_source();
        self.scenario_regeneration();
    }

    /// Results so far.
    #[must_use]
    pub fn results(&self) -> &[DrillResult] {
        &self.results
    }

    /// Client B shoots the player controlled by client A.
    fn scenario_forwarded_hit(&mut self, cluster: &mut Cluster) {
        cluster.clear();
        let start = Instant::now();

        let routed = cluster
            .client_b
            .node
            .request_damage(PLAYER, 30.0, ATTACKER, DamageKind::ByPlayer);
        cluster.settle();
        let elapsed = start.elapsed();

        let mut failures = Vec::new();
        if routed != RouteOutcome::Forwarded(HOST_PROCESS) {
            failures.push(format!("client applied locally: {:?}", routed));
        }
        check_health(&mut failures, "host", cluster.host.node.health(PLAYER), 70.0);
        check_health(&mut failures, "replica", cluster.client_a.node.health(PLAYER), 70.0);
        if cluster.deaths(PLAYER) != [0, 0, 0] {
            failures.push("unexpected death".to_string());
        }
        if cluster.host.node.last_attacker(PLAYER).map(|h| h.id) != Some(ATTACKER) {
            failures.push("last attacker did not resolve".to_string());
        }
        if cluster.client_a.count(EventType::HitFeedback, PLAYER) != 1 {
            failures.push("owner got no hit feedback".to_string());
        }
        if cluster.client_b.count(EventType::HitFeedback, PLAYER) != 0 {
            failures.push("feedback leaked to attacker".to_string());
        }

        self.record("A: forwarded hit", elapsed, failures, || {
            "70/100, feedback to owner only".to_string()
        });
    }

    /// The AI finishes the player off.
    fn scenario_lethal_hit(&mut self, cluster: &mut Cluster) {
        cluster.clear();
        let start = Instant::now();

        cluster
            .host
            .node
            .request_damage(PLAYER, 80.0, AI, DamageKind::ByAi);
        cluster.settle();
        let elapsed = start.elapsed();

        let mut failures = Vec::new();
        check_health(&mut failures, "host", cluster.host.node.health(PLAYER), 0.0);
        if cluster.deaths(PLAYER) != [1, 1, 1] {
            failures.push(format!("deaths per process {:?}", cluster.deaths(PLAYER)));
        }
        let killer = cluster.client_a.seen.iter().find_map(|e| match e {
            ActorEvent::Died { killer, .. } => *killer,
            _ => None,
        });
        if killer.map(|h| h.id) != Some(AI) {
            failures.push("killer did not resolve".to_string());
        }

        self.record("B: lethal hit", elapsed, failures, || {
            "one death on every process".to_string()
        });
    }

    /// More damage after death changes nothing.
    fn scenario_overkill(&mut self, cluster: &mut Cluster) {
        cluster.clear();
        let start = Instant::now();

        cluster
            .client_b
            .node
            .request_damage(PLAYER, 50.0, ATTACKER, DamageKind::ByPlayer);
        cluster
            .host
            .node
            .request_damage(PLAYER, 50.0, AI, DamageKind::ByAi);
        cluster.settle();
        let elapsed = start.elapsed();

        let mut failures = Vec::new();
        check_health(&mut failures, "host", cluster.host.node.health(PLAYER), 0.0);
        if cluster.deaths(PLAYER) != [0, 0, 0] {
            failures.push(format!("second death {:?}", cluster.deaths(PLAYER)));
        }

        self.record("C: overkill", elapsed, failures, || {
            "health stays 0, no second death".to_string()
        });
    }

    /// Healing a dead actor restores health but not life.
    fn scenario_heal_dead(&mut self, cluster: &mut Cluster) {
        cluster.clear();
        let start = Instant::now();

        let healed = cluster.host.node.heal(PLAYER, 20.0);
        cluster.settle();
        let elapsed = start.elapsed();

        let mut failures = Vec::new();
        if healed != Ok(20.0) {
            failures.push(format!("heal returned {:?}", healed));
        }
        check_health(&mut failures, "replica", cluster.client_a.node.health(PLAYER), 20.0);
        if cluster.host.node.is_dead(PLAYER) != Some(true)
            || cluster.client_a.node.is_dead(PLAYER) != Some(true)
        {
            failures.push("actor revived".to_string());
        }
        if cluster.client_a.node.heal(PLAYER, 5.0).is_ok() {
            failures.push("client healed directly".to_string());
        }

        self.record("D: heal after death", elapsed, failures, || {
            "20/100, still dead".to_string()
        });
    }

    /// A source that was never spawned still lands its damage.
    fn scenario_unknown_source(&mut self) {
        let mut cluster = Cluster::new(AuthorityConfig::default());
        let start = Instant::now();

        let routed = cluster
            .host
            .node
            .request_damage(FRESH, 25.0, NEVER_SPAWNED, DamageKind::ByOther);
        cluster.settle();
        let elapsed = start.elapsed();

        let mut failures = Vec::new();
        let attacker = routed.applied().and_then(|o| o.attacker);
        if attacker.is_some() {
            failures.push("unknown source resolved".to_string());
        }
        check_health(&mut failures, "host", cluster.host.node.health(FRESH), 75.0);
        check_health(&mut failures, "replica", cluster.client_b.node.health(FRESH), 75.0);
        if cluster.host.node.last_attacker(FRESH).is_some() {
            failures.push("last attacker resolved".to_string());
        }
        if cluster.directory.lookups() == 0 {
            failures.push("directory never consulted".to_string());
        }

        self.record("E: unknown source", elapsed, failures, || {
            "75/100, attacker not found".to_string()
        });
    }

    /// Out-of-combat regeneration driven by the fixed-step tick.
    fn scenario_regeneration(&mut self) {
        let mut config = AuthorityConfig::default();
        config.regen.enabled = true;
        config.regen.rate_per_second = 10.0;
        config.regen.delay_seconds = 1.0;

        let mut cluster = Cluster::new(config.clone());
        let clock = ManualClock::new();
        let mut tick_loop = TickLoop::from_config(&config, clock.clone());

        // The forwarded hit waits in the host inbox for the first step
        cluster
            .client_b
            .node
            .request_damage(FRESH, 50.0, ATTACKER, DamageKind::ByPlayer);

        let start = Instant::now();
        for _ in 0..30 {
            clock.advance(Duration::from_millis(100));
            tick_loop.run(&mut cluster.host.node, &cluster.host.inbox);
            cluster.settle();
        }
        let elapsed = start.elapsed();
        let stats = *tick_loop.stats();

        let mut failures = Vec::new();
        if stats.messages != 1 || stats.skipped != 0 {
            failures.push(format!("tick loop stats {:?}", stats));
        }
        // Two seconds of regen at 10/s after a one second delay
        let health = cluster.host.node.health(FRESH).unwrap_or_default();
        if !(68.0..=72.0).contains(&health) {
            failures.push(format!("host health {:.2}", health));
        }
        let replica = cluster.client_a.node.health(FRESH).unwrap_or_default();
        if (replica - health).abs() > f32::EPSILON {
            failures.push(format!("replica {:.2} != host {:.2}", replica, health));
        }

        self.record("Regeneration", elapsed, failures, || {
            format!("{:.1}/100 after {} ticks", health, stats.ticks)
        });
    }

    fn record(
        &mut self,
        name: &str,
        elapsed: Duration,
        failures: Vec<String>,
        summary: impl FnOnce() -> String,
    ) {
        let latency_us = elapsed.as_micros() as u64;
        let mut passed = failures.is_empty();
        let mut details = failures.join(". ");

        if latency_us > TARGET_US {
            passed = false;
            details.push_str(&format!(" Latency {} > {} target.", latency_us, TARGET_US));
        }
        if details.is_empty() {
            details = summary();
        }

        self.results.push(DrillResult {
            name: name.to_string(),
            passed,
            latency_us,
            target_us: TARGET_US,
            details,
        });
    }

    /// Prints a results table.
    pub fn print_results(&self) {
        println!();
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    DAMAGE AUTHORITY DRILL                        ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();

        for result in &self.results {
            let status = if result.passed { "✓ PASS" } else { "✗ FAIL" };
            let latency_status = if result.latency_us <= result.target_us {
                format!("{}μs ≤ {}μs ✓", result.latency_us, result.target_us)
            } else {
                format!("{}μs > {}μs ✗", result.latency_us, result.target_us)
            };

            println!("┌─ {} ", result.name);
            println!("│ Status:  {}", status);
            println!("│ Latency: {}", latency_status);
            println!("│ Details: {}", result.details);
            println!("└──────────────────────────────────────────────────────────────────┘");
            println!();
        }

        println!("╔══════════════════════════════════════════════════════════════════╗");
        if self.all_passed() {
            println!("║  ✓ ALL SCENARIOS PASSED - AUTHORITY HOLDS                        ║");
        } else {
            println!("║  ✗ SOME SCENARIOS FAILED - AUTHORITY BROKEN                      ║");
        }
        println!("╚══════════════════════════════════════════════════════════════════╝");
    }

    /// Whether every scenario passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.passed)
    }
}

impl Default for DamageDrill {
    fn default() -> Self {
        Self::new()
    }
}

fn check_health(failures: &mut Vec<String>, who: &str, actual: Option<f32>, expected: f32) {
    match actual {
        Some(health) if (health - expected).abs() <= f32::EPSILON => {}
        other => failures.push(format!("{} health {:?}, expected {}", who, other, expected)),
    }
}
