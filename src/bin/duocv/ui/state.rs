//! Shared state types for UI communication
//!
//! Everything crossing from the audio thread is `Copy` and allocation-free.

use duo_cv::{persist::SavedState, CvFrame, EngineConfig, MidiCv, MidiMessage};

/// What the audio thread reports after a block
#[derive(Clone, Copy, Debug)]
pub struct Snapshot {
    pub frame: CvFrame,
    pub config: EngineConfig,
    pub ticks: u32,
    pub pedal: bool,
    pub sample_rate: f32,
    /// Settings to write out on quit
    pub saved: SavedState,
}

impl Snapshot {
    pub fn capture(engine: &MidiCv, sample_rate: f32) -> Self {
        Self {
            frame: *engine.frame(),
            config: *engine.config(),
            ticks: engine.transport().ticks(),
            pedal: engine.performance().pedal(),
            sample_rate,
            saved: engine.save_state(),
        }
    }
}

/// Tracker-style layout: the home row is white keys, the row above black keys.
const NOTE_KEYS: [char; 13] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k',
];

const VELOCITY: u8 = 100;

/// The computer keyboard as a MIDI controller.
///
/// Terminals report key presses but not releases, so note keys latch.
pub struct Keyboard {
    pub octave: i8,
    /// MIDI channel each sounding note was sent on.
    held: [Option<u8>; 128],
    /// Next member channel when spreading notes for MPE.
    next_member: u8,
    pub pedal: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 4,
            held: [None; 128],
            next_member: 1,
            pedal: false,
        }
    }

    /// MIDI note for a key in the current octave, if it is a note key.
    pub fn note_for(&self, key: char) -> Option<u8> {
        let offset = NOTE_KEYS.iter().position(|&k| k == key)? as i32;
        let note = (self.octave as i32 + 1) * 12 + offset;
        u8::try_from(note).ok().filter(|&n| n < 128)
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = (self.octave + delta).clamp(-1, 9);
    }

    /// Latch or unlatch `note`. With `mpe` set each new note gets its own
    /// member channel (1-15).
    pub fn toggle(&mut self, note: u8, mpe: bool) -> MidiMessage {
        let slot = &mut self.held[note as usize];
        match slot.take() {
            Some(channel) => MidiMessage::note_off(channel, note),
            None => {
                let channel = if mpe {
                    let channel = self.next_member;
                    self.next_member = self.next_member % 15 + 1;
                    channel
                } else {
                    0
                };
                *slot = Some(channel);
                MidiMessage::note_on(channel, note, VELOCITY)
            }
        }
    }

    /// Forget every latched note (the engine has been panicked).
    pub fn clear(&mut self) {
        self.held = [None; 128];
        self.pedal = false;
    }
}
