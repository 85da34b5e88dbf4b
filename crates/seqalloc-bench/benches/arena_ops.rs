//! Criterion micro-benchmarks for arena allocation, clean and reset cycles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use seqalloc::SeqArena;
use seqalloc_bench::{fill_boxed, fill_frame, frame_kinds, Particle};

const FRAME: usize = 10_000;

/// Benchmark: Allocate 10K u64 values into a warm arena, then clean.
fn bench_alloc_u64_10k(c: &mut Criterion) {
    let mut arena: SeqArena = SeqArena::new().unwrap();
    c.bench_function("alloc_u64_10k", |b| {
        b.iter(|| {
            for i in 0..FRAME as u64 {
                black_box(arena.alloc(i).unwrap());
            }
            arena.clean();
        });
    });
}

/// Benchmark: One heterogeneous frame per iteration, reusing blocks via clean.
fn bench_frame_clean(c: &mut Criterion) {
    let kinds = frame_kinds(FRAME, 42);
    let mut arena: SeqArena = SeqArena::new().unwrap();
    c.bench_function("frame_clean_10k", |b| {
        b.iter(|| {
            black_box(fill_frame(&arena, &kinds).unwrap());
            arena.clean();
        });
    });
}

/// Benchmark: One heterogeneous frame per iteration, releasing blocks via reset.
fn bench_frame_reset(c: &mut Criterion) {
    let kinds = frame_kinds(FRAME, 42);
    let mut arena: SeqArena = SeqArena::new().unwrap();
    c.bench_function("frame_reset_10k", |b| {
        b.iter(|| {
            black_box(fill_frame(&arena, &kinds).unwrap());
            arena.reset();
        });
    });
}

/// Benchmark: The same frame through individual boxes (baseline).
fn bench_frame_boxed(c: &mut Criterion) {
    let kinds = frame_kinds(FRAME, 42);
    c.bench_function("frame_boxed_10k", |b| {
        b.iter(|| black_box(fill_boxed(&kinds)));
    });
}

/// Benchmark: Construct a fresh arena and fill it with particles.
fn bench_arena_lifecycle(c: &mut Criterion) {
    c.bench_function("arena_lifecycle_1k_particles", |b| {
        b.iter(|| {
            let arena: SeqArena<1024> = SeqArena::new().unwrap();
            for _ in 0..1_000 {
                black_box(arena.alloc(Particle::default()).unwrap());
            }
            black_box(arena.block_count())
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_u64_10k,
    bench_frame_clean,
    bench_frame_reset,
    bench_frame_boxed,
    bench_arena_lifecycle
);
criterion_main!(benches);
