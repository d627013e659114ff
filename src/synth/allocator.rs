/*
Channel Allocation
==================

Every note-on has to land on one of the output channels. Which one depends on
the polyphony mode. The allocator sees the voice bank and keeps a single piece
of state of its own: the rotation cursor.

Vocabulary
----------

  active order  The channels in play, in "bus order": bus A channels
                [first, channels_a) followed by bus B channels [0, channels_b).
                `first` is 0 normally and 1 in MPE, where bus A channel 0 is
                the master channel and never receives notes.

  cursor        The slot handed out last by rotation, or "before the first
                slot" after a panic. Advancing walks the active order and wraps
                from the last bus B channel back to the first bus A channel.

  steal         Handing out a slot whose gate is still high.


Strategies
----------

  Rotate   Advance the cursor up to one full lap looking for a free gate. If
           every channel is sounding, advance once more and steal whatever is
           there: the channel after the one the lap started on, i.e. the
           oldest by rotation order.

  Reuse    If some active channel already holds the same note number (sounding
           or not), hand that one back. Otherwise rotate.

  Reset    Lowest free channel in bus order. If none, steal the last active
           channel.

A single channel on bus A with bus B disabled is monophonic and always gets
bus A channel 0.

Example, Rotate with 3 channels, every note released straight away:

    cursor:  -  →  A0  →  A1  →  A2  →  A0  → ...
*/

use crate::{
    config::{Assignment, EngineConfig, Strategy},
    synth::voice::{Bus, SlotId, VoiceBank},
};

/// The channels currently taking part in allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSlots {
    first_a: u8,
    channels_a: u8,
    channels_b: u8,
}

impl ActiveSlots {
    pub fn new(config: &EngineConfig, reserve_master: bool) -> Self {
        Self {
            first_a: u8::from(reserve_master),
            channels_a: config.channels(Bus::A) as u8,
            channels_b: config.channels(Bus::B) as u8,
        }
    }

    pub fn len(&self) -> usize {
        self.channels_a.saturating_sub(self.first_a) as usize + self.channels_b as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All slots in bus order.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> {
        (self.first_a..self.channels_a)
            .map(SlotId::a)
            .chain((0..self.channels_b).map(SlotId::b))
    }

    pub fn first(&self) -> Option<SlotId> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<SlotId> {
        if self.channels_b > 0 {
            Some(SlotId::b(self.channels_b - 1))
        } else if self.channels_a > self.first_a {
            Some(SlotId::a(self.channels_a - 1))
        } else {
            None
        }
    }

    /// The slot after `current` in rotation order, wrapping at the end.
    pub fn next_after(&self, current: Option<SlotId>) -> Option<SlotId> {
        let Some(current) = current else {
            return self.first();
        };

        match current.bus {
            Bus::A => {
                let next = (current.channel + 1).max(self.first_a);
                if next < self.channels_a {
                    Some(SlotId::a(next))
                } else if self.channels_b > 0 {
                    Some(SlotId::b(0))
                } else {
                    self.first()
                }
            }
            Bus::B => {
                let next = current.channel + 1;
                if next < self.channels_b {
                    Some(SlotId::b(next))
                } else {
                    self.first()
                }
            }
        }
    }
}

/// Picks the slot for each note-on and remembers where rotation left off.
#[derive(Debug, Clone, Default)]
pub struct ChannelAllocator {
    cursor: Option<SlotId>,
}

impl ChannelAllocator {
    pub fn new() -> Self {
        Self { cursor: None }
    }

    /// Put the cursor back to where a fresh engine starts.
    pub fn reset(&mut self, config: &EngineConfig) {
        self.cursor = if config.cursor_starts_on_master() {
            Some(SlotId::MASTER)
        } else {
            None
        };
    }

    pub fn cursor(&self) -> Option<SlotId> {
        self.cursor
    }

    /// Choose the slot for `note` arriving on `midi_channel`.
    ///
    /// In the allocating MPE sub-modes this also routes the MIDI channel to
    /// the chosen slot for later bend/pressure/CC messages.
    pub fn assign(
        &mut self,
        bank: &mut VoiceBank,
        config: &EngineConfig,
        note: u8,
        midi_channel: u8,
    ) -> SlotId {
        let (strategy, mpe) = match config.assignment() {
            Assignment::Monophonic => return SlotId::MASTER,
            Assignment::Direct => return SlotId::a(midi_channel & 0x0f),
            Assignment::Allocate { strategy, mpe } => (strategy, mpe),
        };

        let slots = ActiveSlots::new(config, mpe);
        let slot = match strategy {
            Strategy::Reuse => slots
                .iter()
                .find(|&slot| bank.voice(slot).note == note)
                .unwrap_or_else(|| self.rotate(bank, &slots)),
            Strategy::Rotate => self.rotate(bank, &slots),
            Strategy::Reset => slots
                .iter()
                .find(|&slot| !bank.voice(slot).gate)
                .or_else(|| slots.last())
                .unwrap_or(SlotId::MASTER),
        };

        if mpe {
            bank.assign(midi_channel, slot);
        }
        slot
    }

    fn rotate(&mut self, bank: &VoiceBank, slots: &ActiveSlots) -> SlotId {
        for _ in 0..slots.len() {
            self.cursor = slots.next_after(self.cursor);
            if let Some(slot) = self.cursor {
                if !bank.voice(slot).gate {
                    return slot;
                }
            }
        }

        // Every channel is sounding: steal the next one along.
        self.cursor = slots.next_after(self.cursor);
        self.cursor.unwrap_or(SlotId::MASTER)
    }
}
