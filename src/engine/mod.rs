//! The MIDI → CV engine.
//!
//! [`MidiCv`] owns the configuration, the performance state and the transport.
//! The host calls [`MidiCv::tick`] once per sample on the audio thread:
//!
//! 1. pending [`ControlMessage`]s are applied,
//! 2. every queued MIDI message is interpreted, in order,
//! 3. one frame of CV is rendered.
//!
//! Nothing in a tick allocates, locks or fails.

pub mod control;
mod interpreter;
mod render;
pub mod transport;

#[cfg(feature = "rtrb")]
pub use control::{control_channel, ControlHandle};
pub use control::ControlMessage;
pub use transport::Transport;

use crate::{
    config::{BendRange, ClockDivision, EngineConfig, MpeMode, PolyMode},
    io::{midi::MessageReceiver, CvFrame, CvInputs, MidiMessage},
    synth::{performance::Performance, voice::Bus},
};

pub struct MidiCv {
    config: EngineConfig,
    performance: Performance,
    transport: Transport,
    frame: CvFrame,
}

impl MidiCv {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            performance: Performance::new(&config),
            config,
            transport: Transport::new(),
            frame: CvFrame::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    #[cfg(feature = "serde")]
    pub(crate) fn performance_mut(&mut self) -> &mut Performance {
        &mut self.performance
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Output of the most recent render.
    pub fn frame(&self) -> &CvFrame {
        &self.frame
    }

    /// One full sample: controls, then MIDI, then render.
    pub fn tick<C, M>(
        &mut self,
        sample_time: f32,
        controls: &mut C,
        midi: &mut M,
        inputs: &CvInputs,
    ) -> &CvFrame
    where
        C: MessageReceiver<ControlMessage>,
        M: MessageReceiver<MidiMessage>,
    {
        while let Some(msg) = controls.pop() {
            self.apply(msg);
        }
        self.drain(midi);
        self.render(sample_time, inputs)
    }

    /// Interpret every pending MIDI message.
    pub fn drain<M: MessageReceiver<MidiMessage>>(&mut self, midi: &mut M) {
        while let Some(msg) = midi.pop() {
            self.process_message(msg);
        }
    }

    pub fn apply(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::SetChannels(bus, channels) => self.set_channels(bus, channels),
            ControlMessage::SetPolyMode(mode) => self.set_poly_mode(mode),
            ControlMessage::SetMpeMode(mode) => self.set_mpe_mode(mode),
            ControlMessage::SetClockDivision(division) => self.set_clock_division(division),
            ControlMessage::SetBendRangeUp(range) => self.config.bend_range_up = range,
            ControlMessage::SetBendRangeDown(range) => self.config.bend_range_down = range,
            ControlMessage::Panic => self.panic(),
            ControlMessage::Reset => self.reset(),
        }
    }

    /// Change a bus's channel count (clamped to its range). Panics the
    /// performance if the count actually changes.
    pub fn set_channels(&mut self, bus: Bus, channels: usize) {
        let before = self.config.channels(bus);
        if self.config.set_channels(bus, channels) != before {
            self.panic();
        }
    }

    pub fn set_poly_mode(&mut self, mode: PolyMode) {
        if mode != self.config.poly_mode {
            self.config.poly_mode = mode;
            self.panic();
        }
    }

    pub fn set_mpe_mode(&mut self, mode: MpeMode) {
        if mode != self.config.mpe_mode {
            self.config.mpe_mode = mode;
            self.panic();
        }
    }

    pub fn set_clock_division(&mut self, division: ClockDivision) {
        self.config.clock_division = division;
    }

    pub fn set_bend_ranges(&mut self, up: BendRange, down: BendRange) {
        self.config.bend_range_up = up;
        self.config.bend_range_down = down;
    }

    /// Drop all notes, pedal and expression; keep the configuration.
    pub fn panic(&mut self) {
        self.performance.panic(&self.config);
    }

    /// Default configuration and a clean performance.
    pub fn reset(&mut self) {
        self.config = EngineConfig::default();
        self.panic();
    }
}

impl Default for MidiCv {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
