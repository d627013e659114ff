//! Turns decoded MIDI into changes to the performance and transport.

use crate::{
    config::{MpeMode, PolyMode},
    io::midi::{MidiEvent, MidiMessage, CC_MOD_WHEEL, CC_SUSTAIN},
    synth::voice::SlotId,
};

use super::MidiCv;

impl MidiCv {
    /// Apply one message. Unknown statuses and controllers are ignored.
    pub fn process_message(&mut self, msg: MidiMessage) {
        let Some(event) = msg.event() else {
            return;
        };

        match event {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => {
                let slot = self.performance.press(&self.config, key, channel);
                self.performance.bank.voice_mut(slot).velocity = velocity;
            }
            MidiEvent::NoteOff { key, .. } => {
                self.performance.release(&self.config, key);
            }
            MidiEvent::KeyPressure { key, pressure, .. } => {
                // Every slot on that note, whichever bus or MPE channel it belongs to.
                for voice in self.performance.bank.voices_mut() {
                    if voice.note == key {
                        voice.aftertouch = pressure;
                    }
                }
            }
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            } => self.control_change(channel, controller, value),
            MidiEvent::ChannelPressure { channel, pressure } => {
                if self.config.is_mpe() {
                    let slot = self.expression_slot(channel);
                    self.performance.bank.voice_mut(slot).aftertouch = pressure;
                } else {
                    for voice in self.performance.bank.voices_mut() {
                        voice.aftertouch = pressure;
                    }
                }
            }
            MidiEvent::PitchBend { channel, value } => {
                let slot = self.expression_slot(channel);
                self.performance.bank.voice_mut(slot).bend = value;
            }
            MidiEvent::Clock => self.transport.clock(self.config.clock_division),
            MidiEvent::Start => self.transport.start(),
            MidiEvent::Continue => self.transport.continue_(),
            MidiEvent::Stop => self.transport.stop(),
        }
    }

    fn control_change(&mut self, channel: u8, controller: u8, value: u8) {
        match controller {
            CC_MOD_WHEEL => {
                let slot = self.expression_slot(channel);
                self.performance.bank.voice_mut(slot).mod_wheel = value;
            }
            CC_SUSTAIN => {
                if value >= 64 {
                    self.performance.press_pedal();
                } else {
                    self.performance.release_pedal(&self.config);
                }
            }
            _ => {}
        }
    }

    /// Slot that per-channel expression (bend, mod, pressure) lands on.
    ///
    /// Outside MPE everything shares bus A channel 0.
    fn expression_slot(&self, midi_channel: u8) -> SlotId {
        match (self.config.poly_mode, self.config.mpe_mode) {
            (PolyMode::Mpe, MpeMode::Direct) => SlotId::a(midi_channel & 0x0f),
            (PolyMode::Mpe, _) => self.performance.bank.assigned(midi_channel),
            _ => SlotId::MASTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{EngineConfig, MpeMode, PolyMode},
        io::midi::{MidiMessage, CC_MOD_WHEEL, CC_SUSTAIN},
        synth::voice::{Bus, SlotId},
        MidiCv,
    };

    fn engine(poly_mode: PolyMode, mpe_mode: MpeMode, channels: usize) -> MidiCv {
        let config = EngineConfig::default()
            .with_modes(poly_mode, mpe_mode)
            .with_channels(channels, 0);
        MidiCv::new(config)
    }

    #[test]
    fn note_on_stores_velocity_on_its_slot() {
        let mut cv = engine(PolyMode::Rotate, MpeMode::Direct, 4);
        cv.process_message(MidiMessage::note_on(0, 60, 100));
        cv.process_message(MidiMessage::note_on(0, 64, 30));

        let bank = &cv.performance().bank;
        assert_eq!(bank.voice(SlotId::a(0)).velocity, 100);
        assert_eq!(bank.voice(SlotId::a(1)).velocity, 30);
    }

    #[test]
    fn key_pressure_reaches_every_matching_slot() {
        let mut cv = engine(PolyMode::Rotate, MpeMode::Direct, 4);
        cv.process_message(MidiMessage::note_on(0, 62, 100));
        cv.process_message(MidiMessage::key_pressure(0, 62, 77));

        let bank = &cv.performance().bank;
        assert_eq!(bank.voice(SlotId::a(0)).aftertouch, 77);
        // Idle slots keep the default note 60, not 62.
        assert_eq!(bank.voice(SlotId::a(1)).aftertouch, 0);
    }

    #[test]
    fn channel_pressure_broadcasts_outside_mpe() {
        let mut cv = engine(PolyMode::Reset, MpeMode::Direct, 4);
        cv.process_message(MidiMessage::channel_pressure(3, 90));

        let bank = &cv.performance().bank;
        for bus in Bus::BOTH {
            assert!(bank.bus(bus).iter().all(|v| v.aftertouch == 90));
        }
    }

    #[test]
    fn mod_wheel_targets_master_outside_mpe() {
        let mut cv = engine(PolyMode::Rotate, MpeMode::Direct, 4);
        cv.process_message(MidiMessage::control_change(7, CC_MOD_WHEEL, 99));

        assert_eq!(cv.performance().bank.voice(SlotId::MASTER).mod_wheel, 99);
    }

    #[test]
    fn mpe_expression_follows_assigned_channel() {
        let mut cv = engine(PolyMode::Mpe, MpeMode::Rotate, 4);
        cv.process_message(MidiMessage::note_on(6, 60, 100));
        cv.process_message(MidiMessage::pitch_bend(6, 0));
        cv.process_message(MidiMessage::channel_pressure(6, 55));

        let voice = cv.performance().bank.voice(SlotId::a(1));
        assert_eq!(voice.bend, 0);
        assert_eq!(voice.aftertouch, 55);
    }

    #[test]
    fn sustain_threshold_is_64() {
        let mut cv = engine(PolyMode::Rotate, MpeMode::Direct, 4);
        cv.process_message(MidiMessage::control_change(0, CC_SUSTAIN, 63));
        assert!(!cv.performance().pedal());

        cv.process_message(MidiMessage::control_change(0, CC_SUSTAIN, 64));
        assert!(cv.performance().pedal());
    }

    #[test]
    fn unknown_controllers_change_nothing() {
        let mut cv = engine(PolyMode::Rotate, MpeMode::Direct, 4);
        let before = cv.performance().bank.voice(SlotId::MASTER).mod_wheel;
        cv.process_message(MidiMessage::control_change(0, 74, 127));
        cv.process_message(MidiMessage::new(0xc, 0, 5, 0));

        assert_eq!(cv.performance().bank.voice(SlotId::MASTER).mod_wheel, before);
    }
}
