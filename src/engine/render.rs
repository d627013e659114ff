//! Per-sample output pass: voice state → port voltages.

use crate::{
    io::{
        converter::{bend_to_cv, gate_to_cv, note_to_cv, seven_bit_to_cv, TRIGGER_THRESHOLD},
        CvFrame, CvInputs,
    },
    synth::voice::{Bus, SlotId},
};

use super::MidiCv;

impl MidiCv {
    /// Advance one sample of `sample_time` seconds and write every port.
    pub fn render(&mut self, sample_time: f32, inputs: &CvInputs) -> &CvFrame {
        let mpe = self.config.is_mpe();
        let up = self.config.bend_range_up;
        let down = self.config.bend_range_down;

        for bus in Bus::BOTH {
            let channels = self.config.channels(bus);
            let voices = self.performance.bank.bus_mut(bus);
            let out = self.frame.bus_mut(bus);

            out.pitch.set_channels(channels);
            out.gate.set_channels(channels);
            out.velocity.set_channels(channels);
            out.aftertouch.set_channels(channels);
            out.retrigger.set_channels(channels);
            out.bent_pitch.set_channels(channels);

            for (c, voice) in voices[..channels].iter_mut().enumerate() {
                if inputs.note_stop(bus, c) >= TRIGGER_THRESHOLD {
                    voice.clear_expression();
                }
                out.pitch.set_voltage(c, note_to_cv(voice.note));
                out.gate.set_voltage(c, gate_to_cv(voice.gate));
                out.velocity.set_voltage(c, seven_bit_to_cv(voice.velocity));
                out.aftertouch.set_voltage(c, seven_bit_to_cv(voice.aftertouch));
                out.retrigger
                    .set_voltage(c, gate_to_cv(voice.retrigger.process(sample_time)));
            }

            if mpe {
                out.pitch_bend.set_channels(channels);
                out.mod_wheel.set_channels(channels);
                for (c, voice) in voices[..channels].iter_mut().enumerate() {
                    let bend = voice
                        .pitch_filter
                        .process(sample_time, bend_to_cv(voice.bend, up, down));
                    let modulation = voice
                        .mod_filter
                        .process(sample_time, seven_bit_to_cv(voice.mod_wheel));
                    out.pitch_bend.set_voltage(c, bend);
                    out.bent_pitch.set_voltage(c, out.pitch.voltage(c) + bend);
                    out.mod_wheel.set_voltage(c, modulation);
                }
            }
        }

        if !mpe {
            // One shared wheel, filtered once on the master slot.
            let master = self.performance.bank.voice_mut(SlotId::MASTER);
            let bend = master
                .pitch_filter
                .process(sample_time, bend_to_cv(master.bend, up, down));
            let modulation = master
                .mod_filter
                .process(sample_time, seven_bit_to_cv(master.mod_wheel));

            for bus in Bus::BOTH {
                let out = self.frame.bus_mut(bus);
                out.pitch_bend.set_channels(1);
                out.pitch_bend.set_voltage(0, bend);
                out.mod_wheel.set_channels(1);
                out.mod_wheel.set_voltage(0, modulation);
                for c in 0..out.pitch.channels() {
                    out.bent_pitch.set_voltage(c, out.pitch.voltage(c) + bend);
                }
            }
        }

        self.transport
            .render(sample_time, &mut self.frame.transport);
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{BendRange, EngineConfig, MpeMode, PolyMode},
        io::{midi::MidiMessage, CvInputs},
        synth::voice::Bus,
        MidiCv,
    };

    const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

    fn poly(channels_a: usize, channels_b: usize) -> MidiCv {
        let mut config = EngineConfig::default();
        config.set_channels(Bus::A, channels_a);
        config.set_channels(Bus::B, channels_b);
        MidiCv::new(config)
    }

    #[test]
    fn ports_follow_channel_counts() {
        let mut cv = poly(3, 5);
        let frame = cv.render(SAMPLE_TIME, &CvInputs::default());

        assert_eq!(frame.bus(Bus::A).pitch.channels(), 3);
        assert_eq!(frame.bus(Bus::B).gate.channels(), 5);
        assert_eq!(frame.bus(Bus::A).pitch_bend.channels(), 1);
        assert_eq!(frame.bus(Bus::B).mod_wheel.channels(), 1);
    }

    #[test]
    fn gate_velocity_and_retrigger_voltages() {
        let mut cv = poly(2, 0);
        cv.process_message(MidiMessage::note_on(0, 72, 127));
        let frame = cv.render(SAMPLE_TIME, &CvInputs::default());
        let bus = frame.bus(Bus::A);

        assert_eq!(bus.pitch.voltage(0), 1.0);
        assert_eq!(bus.gate.voltage(0), 10.0);
        assert!((bus.velocity.voltage(0) - 10.0).abs() < 1e-5);
        assert_eq!(bus.retrigger.voltage(0), 10.0);
        assert_eq!(bus.gate.voltage(1), 0.0);
    }

    #[test]
    fn retrigger_lasts_about_a_millisecond() {
        let mut cv = poly(2, 0);
        cv.process_message(MidiMessage::note_on(0, 60, 100));

        let inputs = CvInputs::default();
        let high = (0..200)
            .filter(|_| {
                let frame = cv.render(SAMPLE_TIME, &inputs);
                frame.bus(Bus::A).retrigger.voltage(0) > 0.0
            })
            .count();
        assert!((48..=49).contains(&high), "retrigger was high for {high} samples");
    }

    #[test]
    fn shared_bend_is_added_to_both_buses() {
        let mut cv = poly(2, 2);
        cv.process_message(MidiMessage::note_on(0, 60, 100));
        cv.process_message(MidiMessage::note_on(0, 72, 100));
        cv.process_message(MidiMessage::note_on(0, 48, 100));
        cv.process_message(MidiMessage::pitch_bend(0, 16383));

        for _ in 0..48_000 {
            cv.render(SAMPLE_TIME, &CvInputs::default());
        }
        let frame = cv.frame();

        let bend = frame.bus(Bus::A).pitch_bend.voltage(0);
        assert!((bend - 5.0).abs() < 1e-2);
        assert_eq!(frame.bus(Bus::B).pitch_bend.voltage(0), bend);
        assert!((frame.bus(Bus::A).bent_pitch.voltage(1) - (1.0 + bend)).abs() < 1e-5);
        assert!((frame.bus(Bus::B).bent_pitch.voltage(0) - (-1.0 + bend)).abs() < 1e-5);
    }

    #[test]
    fn note_stop_neutralises_expression_but_not_gate() {
        let mut cv = poly(2, 0);
        cv.process_message(MidiMessage::note_on(0, 60, 100));
        cv.process_message(MidiMessage::channel_pressure(0, 80));

        let mut inputs = CvInputs::default();
        inputs.set_note_stop(Bus::A, 0, 5.0);
        let frame = cv.render(SAMPLE_TIME, &inputs);

        assert_eq!(frame.bus(Bus::A).velocity.voltage(0), 0.0);
        assert_eq!(frame.bus(Bus::A).aftertouch.voltage(0), 0.0);
        assert_eq!(frame.bus(Bus::A).gate.voltage(0), 10.0);
        // Channel 1 had no stop signal.
        assert!(frame.bus(Bus::A).aftertouch.voltage(1) > 0.0);
    }

    #[test]
    fn mpe_filters_each_channel_separately() {
        let mut config = EngineConfig::default()
            .with_modes(PolyMode::Mpe, MpeMode::Direct)
            .with_channels(4, 0);
        config.bend_range_down = BendRange(12.0);
        let mut cv = MidiCv::new(config);
        cv.process_message(MidiMessage::pitch_bend(2, 0));
        cv.process_message(MidiMessage::control_change(3, 1, 127));

        for _ in 0..48_000 {
            cv.render(SAMPLE_TIME, &CvInputs::default());
        }
        let bus = cv.frame().bus(Bus::A);

        assert_eq!(bus.pitch_bend.channels(), 4);
        assert!((bus.pitch_bend.voltage(2) + 1.0).abs() < 1e-3);
        assert_eq!(bus.pitch_bend.voltage(1), 0.0);
        assert!((bus.mod_wheel.voltage(3) - 10.0).abs() < 1e-3);
        assert_eq!(bus.mod_wheel.voltage(2), 0.0);
    }
}
