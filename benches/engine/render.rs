//! Benchmarks for rendering CV frames.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duo_cv::{
    dsp::{ExponentialFilter, PulseGenerator},
    CvInputs, EngineConfig, MidiCv, MidiMessage, MpeMode, PolyMode,
};

use crate::{BLOCK_SIZES, SAMPLE_TIME};

fn engine(poly_mode: PolyMode, channels_a: usize, channels_b: usize) -> MidiCv {
    let config = EngineConfig::default()
        .with_modes(poly_mode, MpeMode::Direct)
        .with_channels(channels_a, channels_b);

    let mut cv = MidiCv::new(config);
    // Every slot sounding with moving wheels keeps the filters busy.
    for channel in 0..16u8 {
        cv.process_message(MidiMessage::note_on(channel, 48 + channel, 100));
        cv.process_message(MidiMessage::pitch_bend(channel, 12_000));
        cv.process_message(MidiMessage::control_change(channel, 1, 90));
    }
    cv
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render");
    let inputs = CvInputs::default();

    for &size in BLOCK_SIZES {
        // Monophonic default: one channel on bus A.
        let mut mono = MidiCv::default();
        mono.process_message(MidiMessage::note_on(0, 60, 100));
        group.bench_with_input(BenchmarkId::new("mono", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(mono.render(black_box(SAMPLE_TIME), &inputs));
                }
            })
        });

        // Widest layout, shared wheel.
        let mut poly = engine(PolyMode::Rotate, 16, 16);
        group.bench_with_input(BenchmarkId::new("poly_32", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(poly.render(black_box(SAMPLE_TIME), &inputs));
                }
            })
        });

        // Widest layout, one filter pair per slot.
        let mut mpe = engine(PolyMode::Mpe, 16, 16);
        group.bench_with_input(BenchmarkId::new("mpe_32", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(mpe.render(black_box(SAMPLE_TIME), &inputs));
                }
            })
        });
    }

    group.finish();
}

pub fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/filters");

    for &size in BLOCK_SIZES {
        let mut filter = ExponentialFilter::new(1.0 / 30.0);
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    let target = if i % 2 == 0 { 5.0 } else { -5.0 };
                    black_box(filter.process(SAMPLE_TIME, black_box(target)));
                }
            })
        });

        let mut pulse = PulseGenerator::new();
        group.bench_with_input(BenchmarkId::new("pulse", size), &size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    if i % 48 == 0 {
                        pulse.trigger(1e-3);
                    }
                    black_box(pulse.process(SAMPLE_TIME));
                }
            })
        });
    }

    group.finish();
}
