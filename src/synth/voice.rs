use crate::{
    dsp::{ExponentialFilter, PulseGenerator},
    CHANNELS_PER_BUS, TRIGGER_DURATION,
};

/// Time constant of the bend and mod smoothing filters, in seconds.
pub const SMOOTHING_TAU: f32 = 1.0 / 30.0;
pub const DEFAULT_NOTE: u8 = 60;
pub const BEND_CENTER: u16 = 8192;

/// One of the two polyphonic output buses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    A,
    B,
}

impl Bus {
    pub const BOTH: [Bus; 2] = [Bus::A, Bus::B];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Bus::A => 0,
            Bus::B => 1,
        }
    }
}

/// Address of a voice slot: a bus and a channel on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub bus: Bus,
    pub channel: u8,
}

impl SlotId {
    /// Bus A channel 0: the monophonic voice and the MPE master channel.
    pub const MASTER: SlotId = SlotId::a(0);

    pub const fn a(channel: u8) -> Self {
        Self { bus: Bus::A, channel }
    }

    pub const fn b(channel: u8) -> Self {
        Self { bus: Bus::B, channel }
    }
}

/// Performance state of one output channel.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub note: u8,
    pub gate: bool,
    pub velocity: u8,
    pub aftertouch: u8,
    /// 14-bit pitch wheel, 8192 = centre.
    pub bend: u16,
    pub mod_wheel: u8,
    pub retrigger: PulseGenerator,
    pub pitch_filter: ExponentialFilter,
    pub mod_filter: ExponentialFilter,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            note: DEFAULT_NOTE,
            gate: false,
            velocity: 0,
            aftertouch: 0,
            bend: BEND_CENTER,
            mod_wheel: 0,
            retrigger: PulseGenerator::new(),
            pitch_filter: ExponentialFilter::new(SMOOTHING_TAU),
            mod_filter: ExponentialFilter::new(SMOOTHING_TAU),
        }
    }

    /// Start sounding `note` and fire the retrigger pulse.
    pub fn start(&mut self, note: u8) {
        self.note = note;
        self.gate = true;
        self.retrigger.trigger(TRIGGER_DURATION);
    }

    /// Neutralise expression after a note-stop input; the gate is left alone.
    pub fn clear_expression(&mut self) {
        self.velocity = 0;
        self.aftertouch = 0;
        self.bend = BEND_CENTER;
        self.mod_wheel = 0;
        self.pitch_filter.reset();
        self.mod_filter.reset();
    }

    /// Back to power-on state.
    pub fn reset(&mut self) {
        self.note = DEFAULT_NOTE;
        self.gate = false;
        self.clear_expression();
        self.retrigger.reset();
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed bank of 2 × 16 voices plus the MPE channel → slot map.
#[derive(Debug, Clone)]
pub struct VoiceBank {
    buses: [[Voice; CHANNELS_PER_BUS]; 2],
    assigned: [SlotId; 16],
}

impl VoiceBank {
    pub fn new() -> Self {
        Self {
            buses: [[Voice::new(); CHANNELS_PER_BUS]; 2],
            assigned: std::array::from_fn(|c| SlotId::a(c as u8)),
        }
    }

    #[inline]
    pub fn voice(&self, slot: SlotId) -> &Voice {
        &self.buses[slot.bus.index()][slot.channel as usize % CHANNELS_PER_BUS]
    }

    #[inline]
    pub fn voice_mut(&mut self, slot: SlotId) -> &mut Voice {
        &mut self.buses[slot.bus.index()][slot.channel as usize % CHANNELS_PER_BUS]
    }

    pub fn bus(&self, bus: Bus) -> &[Voice; CHANNELS_PER_BUS] {
        &self.buses[bus.index()]
    }

    pub fn bus_mut(&mut self, bus: Bus) -> &mut [Voice; CHANNELS_PER_BUS] {
        &mut self.buses[bus.index()]
    }

    /// Every voice on both buses, bus A first.
    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.buses.iter_mut().flatten()
    }

    /// Slot currently serving `midi_channel` (MPE allocating sub-modes).
    #[inline]
    pub fn assigned(&self, midi_channel: u8) -> SlotId {
        self.assigned[midi_channel as usize & 0x0f]
    }

    pub fn assign(&mut self, midi_channel: u8, slot: SlotId) {
        self.assigned[midi_channel as usize & 0x0f] = slot;
    }

    /// Reset every voice and restore the identity channel map.
    pub fn reset(&mut self) {
        for voice in self.voices_mut() {
            voice.reset();
        }
        for (c, slot) in self.assigned.iter_mut().enumerate() {
            *slot = SlotId::a(c as u8);
        }
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_bank_is_neutral() {
        let bank = VoiceBank::new();
        for bus in Bus::BOTH {
            for voice in bank.bus(bus) {
                assert_eq!(voice.note, DEFAULT_NOTE);
                assert!(!voice.gate);
                assert_eq!(voice.bend, BEND_CENTER);
            }
        }
        assert_eq!(bank.assigned(7), SlotId::a(7));
    }

    #[test]
    fn start_raises_gate_and_retrigger() {
        let mut voice = Voice::new();
        voice.start(64);

        assert_eq!(voice.note, 64);
        assert!(voice.gate);
        assert!(voice.retrigger.is_high());
    }

    #[test]
    fn clear_expression_keeps_gate() {
        let mut voice = Voice::new();
        voice.start(70);
        voice.velocity = 100;
        voice.bend = 0;
        voice.clear_expression();

        assert!(voice.gate);
        assert_eq!(voice.velocity, 0);
        assert_eq!(voice.bend, BEND_CENTER);
    }

    #[test]
    fn reset_restores_identity_map() {
        let mut bank = VoiceBank::new();
        bank.assign(3, SlotId::b(5));
        bank.voice_mut(SlotId::b(5)).start(40);
        bank.reset();

        assert_eq!(bank.assigned(3), SlotId::a(3));
        assert!(!bank.voice(SlotId::b(5)).gate);
    }
}
