//! MIDI clock and start/stop/continue triggers.

use crate::{
    config::ClockDivision,
    dsp::PulseGenerator,
    io::{converter::gate_to_cv, TransportOutputs},
    TRIGGER_DURATION,
};

#[derive(Debug, Clone, Default)]
pub struct Transport {
    /// Clock ticks since the last Start or Stop.
    ticks: u32,
    clock: PulseGenerator,
    clock_divided: PulseGenerator,
    start: PulseGenerator,
    stop: PulseGenerator,
    continue_: PulseGenerator,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// One MIDI clock (24 per quarter note). The divided output fires on
    /// every tick whose count is a multiple of the division, tick 0 included.
    pub fn clock(&mut self, division: ClockDivision) {
        self.clock.trigger(TRIGGER_DURATION);
        if self.ticks % division.ticks() == 0 {
            self.clock_divided.trigger(TRIGGER_DURATION);
        }
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn start(&mut self) {
        self.start.trigger(TRIGGER_DURATION);
        self.ticks = 0;
    }

    pub fn continue_(&mut self) {
        self.continue_.trigger(TRIGGER_DURATION);
    }

    pub fn stop(&mut self) {
        self.stop.trigger(TRIGGER_DURATION);
        self.ticks = 0;
    }

    /// Advance every pulse by one sample and write the trigger voltages.
    #[inline]
    pub fn render(&mut self, sample_time: f32, out: &mut TransportOutputs) {
        out.clock = gate_to_cv(self.clock.process(sample_time));
        out.clock_divided = gate_to_cv(self.clock_divided.process(sample_time));
        out.start = gate_to_cv(self.start.process(sample_time));
        out.stop = gate_to_cv(self.stop.process(sample_time));
        out.continue_ = gate_to_cv(self.continue_.process(sample_time));
    }
}
