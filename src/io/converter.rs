use crate::{config::BendRange, dsp::rescale, synth::voice::BEND_CENTER};

/// Full-scale voltage for gates, triggers and unipolar controllers.
pub const GATE_VOLTAGE: f32 = 10.0;
/// Inputs at or above this voltage count as high.
pub const TRIGGER_THRESHOLD: f32 = 1.0;

/// 1V/octave, MIDI note 60 = 0V.
#[inline]
pub fn note_to_cv(note: u8) -> f32 {
    (note as f32 - 60.0) / 12.0
}

#[inline]
pub fn gate_to_cv(high: bool) -> f32 {
    if high {
        GATE_VOLTAGE
    } else {
        0.0
    }
}

/// 0..127 onto 0..10V (velocity, aftertouch, mod wheel).
#[inline]
pub fn seven_bit_to_cv(value: u8) -> f32 {
    rescale(value as f32, 0.0, 127.0, 0.0, GATE_VOLTAGE)
}

/// Pitch-wheel position to volts, before smoothing.
///
/// The wheel spans ±5V; above centre it is scaled by `up`, at or below
/// centre by `down`.
#[inline]
pub fn bend_to_cv(bend: u16, up: BendRange, down: BendRange) -> f32 {
    let volts = rescale(bend as f32, 0.0, 16384.0, -5.0, 5.0);
    if bend > BEND_CENTER {
        volts * up.scale()
    } else {
        volts * down.scale()
    }
}
