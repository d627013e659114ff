//! MIDI records as delivered by the host, and their decoded meaning.

#[cfg(feature = "rtrb")]
use rtrb::Consumer;
use std::collections::VecDeque;

pub const STATUS_NOTE_OFF: u8 = 0x8;
pub const STATUS_NOTE_ON: u8 = 0x9;
pub const STATUS_KEY_PRESSURE: u8 = 0xa;
pub const STATUS_CONTROL_CHANGE: u8 = 0xb;
pub const STATUS_PROGRAM_CHANGE: u8 = 0xc;
pub const STATUS_CHANNEL_PRESSURE: u8 = 0xd;
pub const STATUS_PITCH_BEND: u8 = 0xe;
pub const STATUS_SYSTEM: u8 = 0xf;

pub const CC_MOD_WHEEL: u8 = 0x01;
pub const CC_SUSTAIN: u8 = 0x40;

/// Undecoded 3-byte message: status nibble, channel nibble, two data bytes.
///
/// For system messages (status 0xF) the channel nibble carries the
/// sub-status (0x8 clock, 0xA start, 0xB continue, 0xC stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiMessage {
    pub status: u8,
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiMessage {
    pub fn new(status: u8, channel: u8, data1: u8, data2: u8) -> Self {
        Self {
            status: status & 0x0f,
            channel: channel & 0x0f,
            data1: data1 & 0x7f,
            data2: data2 & 0x7f,
        }
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(STATUS_NOTE_ON, channel, note, velocity)
    }

    pub fn note_off(channel: u8, note: u8) -> Self {
        Self::new(STATUS_NOTE_OFF, channel, note, 0)
    }

    pub fn key_pressure(channel: u8, note: u8, pressure: u8) -> Self {
        Self::new(STATUS_KEY_PRESSURE, channel, note, pressure)
    }

    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(STATUS_CONTROL_CHANGE, channel, controller, value)
    }

    pub fn channel_pressure(channel: u8, pressure: u8) -> Self {
        Self::new(STATUS_CHANNEL_PRESSURE, channel, pressure, 0)
    }

    /// `value` is the 14-bit wheel position, 8192 = centre.
    pub fn pitch_bend(channel: u8, value: u16) -> Self {
        Self::new(
            STATUS_PITCH_BEND,
            channel,
            (value & 0x7f) as u8,
            ((value >> 7) & 0x7f) as u8,
        )
    }

    pub fn clock() -> Self {
        Self::new(STATUS_SYSTEM, 0x8, 0, 0)
    }

    pub fn start() -> Self {
        Self::new(STATUS_SYSTEM, 0xa, 0, 0)
    }

    pub fn continue_() -> Self {
        Self::new(STATUS_SYSTEM, 0xb, 0, 0)
    }

    pub fn stop() -> Self {
        Self::new(STATUS_SYSTEM, 0xc, 0, 0)
    }

    /// Decode a raw packet from the wire.
    ///
    /// Returns `None` for data bytes without a status (running status is not
    /// supported) and for packets too short for their status.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status_byte, data) = bytes.split_first()?;
        if status_byte & 0x80 == 0 {
            return None;
        }
        let status = status_byte >> 4;
        let channel = status_byte & 0x0f;
        let needed = match status {
            STATUS_PROGRAM_CHANGE | STATUS_CHANNEL_PRESSURE => 1,
            STATUS_SYSTEM => 0,
            _ => 2,
        };
        if data.len() < needed {
            return None;
        }
        let data1 = data.first().copied().unwrap_or(0);
        let data2 = if needed == 2 { data[1] } else { 0 };
        Some(Self::new(status, channel, data1, data2))
    }

    /// Encode back to wire bytes; the slice length follows the status.
    pub fn to_bytes(&self) -> ([u8; 3], usize) {
        let bytes = [(self.status << 4) | self.channel, self.data1, self.data2];
        let len = match self.status {
            STATUS_PROGRAM_CHANGE | STATUS_CHANNEL_PRESSURE => 2,
            STATUS_SYSTEM => 1,
            _ => 3,
        };
        (bytes, len)
    }

    /// What this message means to the engine, if anything.
    pub fn event(&self) -> Option<MidiEvent> {
        let channel = self.channel;
        let event = match self.status {
            STATUS_NOTE_OFF => MidiEvent::NoteOff {
                channel,
                key: self.data1,
            },
            STATUS_NOTE_ON if self.data2 == 0 => MidiEvent::NoteOff {
                channel,
                key: self.data1,
            },
            STATUS_NOTE_ON => MidiEvent::NoteOn {
                channel,
                key: self.data1,
                velocity: self.data2,
            },
            STATUS_KEY_PRESSURE => MidiEvent::KeyPressure {
                channel,
                key: self.data1,
                pressure: self.data2,
            },
            STATUS_CONTROL_CHANGE => MidiEvent::ControlChange {
                channel,
                controller: self.data1,
                value: self.data2,
            },
            STATUS_CHANNEL_PRESSURE => MidiEvent::ChannelPressure {
                channel,
                pressure: self.data1,
            },
            STATUS_PITCH_BEND => MidiEvent::PitchBend {
                channel,
                value: ((self.data2 as u16) << 7) | self.data1 as u16,
            },
            STATUS_SYSTEM => match self.channel {
                0x8 => MidiEvent::Clock,
                0xa => MidiEvent::Start,
                0xb => MidiEvent::Continue,
                0xc => MidiEvent::Stop,
                _ => return None,
            },
            _ => return None,
        };
        Some(event)
    }
}

/// Decoded channel-voice and real-time events the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    /// Also produced by a note-on with velocity 0.
    NoteOff { channel: u8, key: u8 },
    KeyPressure { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    /// 14-bit, 8192 = centre.
    PitchBend { channel: u8, value: u16 },
    Clock,
    Start,
    Continue,
    Stop,
}

/// Anything the engine can drain messages from on the audio thread.
pub trait MessageReceiver<T> {
    fn pop(&mut self) -> Option<T>;
}

#[cfg(feature = "rtrb")]
impl<T> MessageReceiver<T> for Consumer<T> {
    fn pop(&mut self) -> Option<T> {
        Consumer::pop(self).ok()
    }
}

/// Offline rendering and tests.
impl<T> MessageReceiver<T> for VecDeque<T> {
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
}
