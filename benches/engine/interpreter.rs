//! Benchmarks for MIDI interpretation and slot allocation.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use duo_cv::{ControlMessage, CvInputs, EngineConfig, MidiCv, MidiMessage, MpeMode, PolyMode};

use crate::SAMPLE_TIME;

/// A dense chord run: every note on, then off, across all 16 channels.
fn chord_run() -> Vec<MidiMessage> {
    let mut messages = Vec::with_capacity(64);
    for i in 0..32u8 {
        messages.push(MidiMessage::note_on(i % 16, 36 + i, 100));
    }
    for i in 0..32u8 {
        messages.push(MidiMessage::note_off(i % 16, 36 + i));
    }
    messages
}

pub fn bench_interpreter(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/interpreter");
    let messages = chord_run();

    let modes = [
        ("rotate", PolyMode::Rotate, MpeMode::Direct),
        ("reuse", PolyMode::Reuse, MpeMode::Direct),
        ("reset", PolyMode::Reset, MpeMode::Direct),
        ("mpe_direct", PolyMode::Mpe, MpeMode::Direct),
        ("mpe_rotate", PolyMode::Mpe, MpeMode::Rotate),
    ];

    for (name, poly_mode, mpe_mode) in modes {
        let config = EngineConfig::default()
            .with_modes(poly_mode, mpe_mode)
            .with_channels(8, 8);
        let mut cv = MidiCv::new(config);

        group.bench_with_input(BenchmarkId::new(name, messages.len()), &messages, |b, msgs| {
            b.iter(|| {
                for &msg in msgs {
                    cv.process_message(black_box(msg));
                }
            })
        });
    }

    // Full tick with an offline queue, as a host without realtime threads would.
    let mut cv = MidiCv::default();
    let inputs = CvInputs::default();
    group.bench_function("tick_queued", |b| {
        b.iter(|| {
            let mut controls = VecDeque::<ControlMessage>::new();
            let mut midi: VecDeque<_> = messages.iter().copied().collect();
            black_box(cv.tick(SAMPLE_TIME, &mut controls, &mut midi, &inputs));
        })
    });

    group.finish();
}
