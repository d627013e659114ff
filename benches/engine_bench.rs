//! Benchmarks for the MIDI → CV engine.
//!
//! Run with: cargo bench
//!
//! The engine runs once per sample, so every figure here is multiplied by the
//! host sample rate. At 48kHz a block of 64 samples has a 1.33ms deadline.
//!
//! Benchmark groups:
//!   - engine/render       Per-sample output pass across channel layouts
//!   - engine/interpreter  MIDI throughput per allocation mode

use criterion::{criterion_group, criterion_main};

mod engine;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

criterion_group!(
    benches,
    engine::bench_render,
    engine::bench_filters,
    engine::bench_interpreter,
);
criterion_main!(benches);
