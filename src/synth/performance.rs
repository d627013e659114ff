//! Note press/release and sustain pedal state machine.
//!
//! `Performance` owns everything a panic wipes: the voice bank, the held-note
//! stack, the pedal and the rotation cursor.

use crate::{
    config::{Assignment, EngineConfig},
    synth::{
        allocator::ChannelAllocator,
        held::HeldNotes,
        voice::{Bus, SlotId, VoiceBank},
    },
};

#[derive(Debug, Clone, Default)]
pub struct Performance {
    pub bank: VoiceBank,
    held: HeldNotes,
    pedal: bool,
    allocator: ChannelAllocator,
}

impl Performance {
    pub fn new(config: &EngineConfig) -> Self {
        let mut performance = Self::default();
        performance.panic(config);
        performance
    }

    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    pub fn pedal(&self) -> bool {
        self.pedal
    }

    pub fn allocator(&self) -> &ChannelAllocator {
        &self.allocator
    }

    /// Key down. Returns the slot now sounding `note`.
    pub fn press(&mut self, config: &EngineConfig, note: u8, midi_channel: u8) -> SlotId {
        self.held.press(note);

        let slot = match config.assignment() {
            Assignment::Direct => SlotId::a(midi_channel & 0x0f),
            _ => self
                .allocator
                .assign(&mut self.bank, config, note, midi_channel),
        };
        self.bank.voice_mut(slot).start(note);
        slot
    }

    /// Key up.
    pub fn release(&mut self, config: &EngineConfig, note: u8) {
        self.held.release(note);

        if !self.pedal {
            let bus_a = self.bank.bus_mut(Bus::A).iter_mut();
            for voice in bus_a.filter(|v| v.note == note) {
                voice.gate = false;
            }
            let channels_b = config.channels(Bus::B);
            let bus_b = self.bank.bus_mut(Bus::B)[..channels_b].iter_mut();
            for voice in bus_b.filter(|v| v.note == note) {
                voice.gate = false;
            }
        }

        // Last-note priority: fall back to the newest key still down.
        if config.is_monophonic() {
            let master = self.bank.voice_mut(SlotId::MASTER);
            if master.note == note {
                if let Some(last) = self.held.last() {
                    master.note = last;
                    master.gate = true;
                }
            }
        }
    }

    pub fn press_pedal(&mut self) {
        self.pedal = true;
    }

    pub fn release_pedal(&mut self, config: &EngineConfig) {
        if !self.pedal {
            return;
        }
        self.pedal = false;

        if config.is_monophonic() {
            if let Some(last) = self.held.last() {
                self.bank.voice_mut(SlotId::MASTER).note = last;
            }
            return;
        }

        for bus in Bus::BOTH {
            let channels = config.channels(bus);
            for voice in self.bank.bus_mut(bus)[..channels].iter_mut() {
                if voice.gate {
                    voice.gate = self.held.contains(voice.note);
                }
            }
        }
    }

    /// Silence everything and forget all performance state.
    pub fn panic(&mut self, config: &EngineConfig) {
        self.pedal = false;
        self.bank.reset();
        self.held.clear();
        self.allocator.reset(config);
    }
}
