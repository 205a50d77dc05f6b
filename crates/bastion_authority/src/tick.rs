//! # Host Tick Loop
//!
//! Fixed-timestep driver for an [`AuthorityNode`].
//!
//! The node never reads a clock. The loop owns one, converts the time that
//! passed into whole steps, and for each step handles pending messages and
//! advances the node by exactly one step:
//!
//! ```text
//! clock ──► accumulator ──► N due steps ──► per step:
//!                                             node.drain(inbox)
//!                                             node.tick(step)
//! ```
//!
//! The clock is injected, so tests and the drill run on simulated time with
//! [`ManualClock`] while a real host uses [`SystemClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bastion_shared::TICK_RATE;
use tracing::warn;

use crate::config::AuthorityConfig;
use crate::node::AuthorityNode;
use crate::transport::Inbox;

/// Steps run per call before the backlog is discarded.
pub const DEFAULT_MAX_CATCH_UP: u32 = 8;

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn elapsed(&self) -> Duration;
}

/// Wall clock.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Starts counting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Simulated clock advanced by hand. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

/// Counters over the loop's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Steps executed.
    pub ticks: u64,
    /// Inbound messages handled.
    pub messages: u64,
    /// Actor regenerations applied.
    pub regenerated: u64,
    /// Steps dropped because the loop fell too far behind.
    pub skipped: u64,
}

/// Fixed-timestep controller for one node.
pub struct TickLoop<C: Clock = SystemClock> {
    clock: C,
    step: Duration,
    /// Clock reading already converted into steps.
    consumed: Duration,
    max_catch_up: u32,
    stats: TickStats,
}

impl<C: Clock> TickLoop<C> {
    /// Loop at `tick_rate` Hz. A rate of zero is treated as 1.
    #[must_use]
    pub fn new(tick_rate: u32, clock: C) -> Self {
        let step = Duration::from_micros(1_000_000 / u64::from(tick_rate.max(1)));
        let consumed = clock.elapsed();
        Self {
            clock,
            step,
            consumed,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            stats: TickStats::default(),
        }
    }

    /// Loop at the configured tick rate.
    #[must_use]
    pub fn from_config(config: &AuthorityConfig, clock: C) -> Self {
        Self::new(config.tick_rate, clock)
    }

    /// Caps how many steps one [`run`](Self::run) may execute.
    #[must_use]
    pub fn with_max_catch_up(mut self, steps: u32) -> Self {
        self.max_catch_up = steps.max(1);
        self
    }

    /// Converts elapsed time into due steps and consumes them.
    ///
    /// Anything past the catch-up cap is discarded, not queued.
    pub fn due_steps(&mut self) -> u32 {
        let now = self.clock.elapsed();
        let behind = now.saturating_sub(self.consumed).as_nanos();
        let step = self.step.as_nanos();
        let due = u64::try_from(behind / step).unwrap_or(u64::MAX);
        let run = due.min(u64::from(self.max_catch_up));

        // Keep the partial step for next time
        let remainder = Duration::from_nanos((behind % step) as u64);
        self.consumed = now.saturating_sub(remainder);
        if due > run {
            self.stats.skipped += due - run;
            warn!("tick loop {} steps behind; skipped {}", due, due - run);
        }
        u32::try_from(run).unwrap_or(u32::MAX)
    }

    /// Runs every due step against `node`. Returns how many ran.
    pub fn run(&mut self, node: &mut AuthorityNode, inbox: &Inbox) -> u32 {
        let steps = self.due_steps();
        for _ in 0..steps {
            self.stats.messages += node.drain(inbox) as u64;
            self.stats.regenerated += node.tick(self.step) as u64;
            self.stats.ticks += 1;
        }
        steps
    }

    /// Length of one step.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.step
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }
}

impl Default for TickLoop<SystemClock> {
    fn default() -> Self {
        Self::new(TICK_RATE, SystemClock::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorSpec;
    use crate::transport::{
        AuthorityContext, LoopbackHub, SharedDirectory, StaticAuthority, Transport,
    };
    use bastion_shared::{ActorId, DamageKind, DamageRequest, ProcessId, WireMessage};

    const HOST: ProcessId = ProcessId(0);

    fn regen_config() -> AuthorityConfig {
        let mut config = AuthorityConfig::default();
        config.tick_rate = 10;
        config.regen.enabled = true;
        config.regen.rate_per_second = 10.0;
        config.regen.delay_seconds = 0.0;
        config
    }

    #[test]
    fn test_step_from_rate() {
        assert_eq!(
            TickLoop::<SystemClock>::default().tick_duration(),
            Duration::from_micros(16666)
        );
        assert_eq!(
            TickLoop::new(0, ManualClock::new()).tick_duration(),
            Duration::from_secs(1)
        );
        assert_eq!(
            TickLoop::from_config(&regen_config(), ManualClock::new()).tick_duration(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_due_steps_keep_remainder() {
        let clock = ManualClock::new();
        let mut tick_loop = TickLoop::new(10, clock.clone());

        clock.advance(Duration::from_millis(250));
        assert_eq!(tick_loop.due_steps(), 2);

        // The leftover 50ms completes the next step
        clock.advance(Duration::from_millis(50));
        assert_eq!(tick_loop.due_steps(), 1);
        assert_eq!(tick_loop.due_steps(), 0);
    }

    #[test]
    fn test_backlog_is_capped() {
        let clock = ManualClock::new();
        let mut tick_loop = TickLoop::new(10, clock.clone()).with_max_catch_up(3);

        clock.advance(Duration::from_secs(1));
        assert_eq!(tick_loop.due_steps(), 3);
        assert_eq!(tick_loop.stats().skipped, 7);
        assert_eq!(tick_loop.due_steps(), 0);
    }

    #[test]
    fn test_system_clock_advances() {
        let mut tick_loop = TickLoop::new(1000, SystemClock::new());
        std::thread::sleep(Duration::from_millis(5));
        assert!(tick_loop.due_steps() >= 1);
    }

    #[test]
    fn test_run_drains_and_regenerates() {
        let hub = LoopbackHub::new();
        let (transport, inbox) = hub.connect(HOST);
        let (client, _client_inbox) = hub.connect(ProcessId(1));
        let context = AuthorityContext::new(
            HOST,
            Arc::new(StaticAuthority::host(HOST)),
            Arc::new(SharedDirectory::new()),
            Arc::new(transport),
        );
        let mut node = AuthorityNode::new(context, regen_config());
        node.spawn_actor(ActorSpec::new(ActorId(1))).unwrap();

        let clock = ManualClock::new();
        let mut tick_loop = TickLoop::from_config(node.config(), clock.clone());

        let hit = DamageRequest::new(ActorId(1), 50.0, ActorId(2), DamageKind::ByAi);
        client.send(HOST, WireMessage::Damage(hit));
        assert_eq!(tick_loop.run(&mut node, &inbox), 0);

        // Every step regenerates 1.0, including the one that applied the hit
        clock.advance(Duration::from_millis(500));
        assert_eq!(tick_loop.run(&mut node, &inbox), 5);

        let stats = *tick_loop.stats();
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.regenerated, 5);
        assert_eq!(node.health(ActorId(1)), Some(55.0));
    }
}
