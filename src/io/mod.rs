// Purpose - external interfaces: MIDI records in, CV ports out

pub mod converter;
pub mod midi;

pub use midi::{MessageReceiver, MidiEvent, MidiMessage};

use crate::{synth::voice::Bus, CHANNELS_PER_BUS};

/// Note-stop voltages read once per sample, per bus and channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct CvInputs {
    pub note_stop: [[f32; CHANNELS_PER_BUS]; 2],
}

impl CvInputs {
    #[inline]
    pub fn note_stop(&self, bus: Bus, channel: usize) -> f32 {
        self.note_stop[bus.index()][channel]
    }

    pub fn set_note_stop(&mut self, bus: Bus, channel: usize, volts: f32) {
        self.note_stop[bus.index()][channel] = volts;
    }
}

/// A polyphonic output jack: up to 16 voltages plus a live channel count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolyPort {
    channels: u8,
    voltages: [f32; CHANNELS_PER_BUS],
}

impl PolyPort {
    pub fn set_channels(&mut self, channels: usize) {
        let channels = channels.min(CHANNELS_PER_BUS);
        // Channels that drop out read as 0V if they come back.
        for v in &mut self.voltages[channels..] {
            *v = 0.0;
        }
        self.channels = channels as u8;
    }

    pub fn channels(&self) -> usize {
        self.channels as usize
    }

    #[inline]
    pub fn set_voltage(&mut self, channel: usize, volts: f32) {
        self.voltages[channel] = volts;
    }

    #[inline]
    pub fn voltage(&self, channel: usize) -> f32 {
        self.voltages[channel]
    }

    /// Voltages of the live channels.
    pub fn voltages(&self) -> &[f32] {
        &self.voltages[..self.channels as usize]
    }
}

/// All ports of one bus.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BusOutputs {
    pub pitch: PolyPort,
    pub gate: PolyPort,
    pub velocity: PolyPort,
    pub aftertouch: PolyPort,
    pub retrigger: PolyPort,
    pub bent_pitch: PolyPort,
    pub pitch_bend: PolyPort,
    pub mod_wheel: PolyPort,
}

/// Monophonic clock and transport triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportOutputs {
    pub clock: f32,
    pub clock_divided: f32,
    pub start: f32,
    pub stop: f32,
    pub continue_: f32,
}

/// Everything the engine writes in one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvFrame {
    pub buses: [BusOutputs; 2],
    pub transport: TransportOutputs,
}

impl CvFrame {
    pub fn bus(&self, bus: Bus) -> &BusOutputs {
        &self.buses[bus.index()]
    }

    pub fn bus_mut(&mut self, bus: Bus) -> &mut BusOutputs {
        &mut self.buses[bus.index()]
    }
}
