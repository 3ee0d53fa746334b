//! Benchmarks for the session tick loop.
//!
//! Run with: `cargo bench --bench session_tick`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use bazi_duel::core::SideId;
use bazi_duel::session::{Command, Session};

/// A session with a few cards on the field and the AI active.
fn busy_session(seed: u64) -> Session {
    let mut session = Session::builder().with_seed(seed).build().unwrap();
    for slot in 4..7 {
        let card = session.state().sides[SideId::Player].hand[0].entity;
        let _ = session.execute(Command::PlaceCard { side: SideId::Player, slot, card });
        let _ = session.execute(Command::ConfirmEffect);
        session.advance(2_000);
    }
    session
}

/// Cost of a single tick on a quiet and on a busy session.
fn benchmark_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tick");

    group.bench_function("fresh", |b| {
        b.iter_batched(
            || Session::builder().with_seed(1).build().unwrap(),
            |mut session| black_box(session.tick()),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("busy", |b| {
        b.iter_batched(
            || busy_session(1),
            |mut session| black_box(session.tick()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Simulated minutes of play, ticks only.
fn benchmark_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Advance");

    for minutes in [1u64, 5] {
        group.bench_with_input(BenchmarkId::new("minutes", minutes), &minutes, |b, &minutes| {
            b.iter_batched(
                || busy_session(7),
                |mut session| {
                    session.advance(minutes * 60_000);
                    black_box(session.drain_events().count())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Snapshot capture and save encoding.
fn benchmark_snapshot(c: &mut Criterion) {
    let session = busy_session(3);

    c.bench_function("snapshot", |b| b.iter(|| black_box(session.snapshot())));
    c.bench_function("save", |b| b.iter(|| black_box(session.save().unwrap())));
}

criterion_group!(benches, benchmark_tick, benchmark_advance, benchmark_snapshot);
criterion_main!(benches);
