//! # Damage Path Benchmark
//!
//! Host-side cost of applying damage: clamp, latch, one attacker lookup,
//! owner feedback and the broadcast hand-off.
//!
//! Run with: `cargo bench --package bastion_authority`

#![allow(missing_docs)]

use std::sync::Arc;

use bastion_authority::{
    ActorSpec, AuthorityConfig, AuthorityContext, AuthorityNode, LoopbackHub, SharedDirectory,
    StaticAuthority, Transport,
};
use bastion_shared::{ActorId, DamageKind, EntityClass, EntityHandle, ProcessId, WireMessage};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const HOST: ProcessId = ProcessId(0);

/// Discards everything so the benchmark measures the node, not a queue.
struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, _target: ProcessId, message: WireMessage) {
        black_box(message);
    }

    fn broadcast(&self, message: WireMessage) {
        black_box(message);
    }
}

fn host_node(actors: u32) -> AuthorityNode {
    let directory = SharedDirectory::new();
    for id in 0..actors {
        directory.register(EntityHandle::owned_by(ActorId(id), EntityClass::Player, ProcessId(1)));
    }
    let context = AuthorityContext::new(
        HOST,
        Arc::new(StaticAuthority::host(HOST)),
        Arc::new(directory),
        Arc::new(NullTransport),
    );

    let mut node = AuthorityNode::new(context, AuthorityConfig::default());
    for id in 0..actors {
        // Large enough that the benchmark rarely reaches the death path
        let spec = ActorSpec::new(ActorId(id)).with_max_health(1_000_000.0);
        node.spawn_actor(spec).expect("fresh ids");
    }
    node
}

/// Non-lethal hits on a single actor.
fn bench_apply_single(c: &mut Criterion) {
    let mut node = host_node(2);
    c.bench_function("apply_damage_single_actor", |b| {
        b.iter(|| {
            black_box(node.request_damage(
                ActorId(0),
                black_box(1.0),
                ActorId(1),
                DamageKind::ByPlayer,
            ))
        });
    });
}

/// Hits spread over many actors.
fn bench_apply_spread(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_damage_spread");

    for count in [100_u32, 1_000, 10_000] {
        let mut node = host_node(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut next = 0;
            b.iter(|| {
                next = (next + 1) % count;
                black_box(node.request_damage(
                    ActorId(next),
                    1.0,
                    ActorId((next + 1) % count),
                    DamageKind::ByPlayer,
                ))
            });
        });
    }

    group.finish();
}

/// Client side: forward plus loopback enqueue.
fn bench_forward(c: &mut Criterion) {
    let hub = LoopbackHub::new();
    let (_host_transport, host_inbox) = hub.connect(HOST);
    let (transport, _client_inbox) = hub.connect(ProcessId(1));
    let context = AuthorityContext::new(
        ProcessId(1),
        Arc::new(StaticAuthority::client(ProcessId(1), HOST)),
        Arc::new(SharedDirectory::new()),
        Arc::new(transport),
    );
    let mut client = AuthorityNode::new(context, AuthorityConfig::default());

    c.bench_function("forward_damage_loopback", |b| {
        b.iter(|| {
            black_box(client.request_damage(ActorId(0), 1.0, ActorId(1), DamageKind::ByPlayer));
            black_box(host_inbox.try_recv())
        });
    });
}

criterion_group!(benches, bench_apply_single, bench_apply_spread, bench_forward);
criterion_main!(benches);
