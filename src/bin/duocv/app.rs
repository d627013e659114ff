//! DuoCv - audio stream setup and runner

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use duo_cv::{engine::control_channel, CvFrame, CvInputs, MidiCv, CHANNELS_PER_BUS};

use super::ui::{Snapshot, UiApp};

/// Pending MIDI messages between the keyboard and the audio thread.
const MIDI_QUEUE: usize = 256;
/// Pending configuration changes.
const CONTROL_QUEUE: usize = 64;
/// Snapshots waiting for the UI; older ones are simply dropped.
const SNAPSHOT_QUEUE: usize = 8;
/// Frames between snapshots (~60 per second at 48kHz).
const SNAPSHOT_INTERVAL: usize = 800;
/// Device full scale in volts.
const FULL_SCALE: f32 = 10.0;

/// Main application builder
pub struct DuoCv {
    state_path: PathBuf,
}

impl DuoCv {
    pub fn new() -> Self {
        Self {
            state_path: PathBuf::from(super::STATE_FILE),
        }
    }

    /// Where settings are loaded from at start and saved to on quit
    pub fn state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Run the application (takes over the terminal, drives the device)
    pub fn run(self) -> EyreResult<()> {
        let mut engine = MidiCv::default();
        if self.state_path.exists() {
            let json = std::fs::read_to_string(&self.state_path)
                .wrap_err_with(|| format!("failed to read {}", self.state_path.display()))?;
            engine
                .restore_json(&json)
                .wrap_err("failed to restore saved state")?;
            info!(path = %self.state_path.display(), "restored engine state");
        }

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate, channels, "opened output device"
        );

        let (controls, mut control_rx) = control_channel(CONTROL_QUEUE);
        let (midi_tx, mut midi_rx) = RingBuffer::new(MIDI_QUEUE);
        let (mut snapshot_tx, snapshot_rx) = RingBuffer::new(SNAPSHOT_QUEUE);

        let initial = Snapshot::capture(&engine, sample_rate);
        let sample_time = 1.0 / sample_rate;
        let inputs = CvInputs::default();
        let mut frames_since_snapshot = 0;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                for out in data.chunks_mut(channels) {
                    let frame = engine.tick(sample_time, &mut control_rx, &mut midi_rx, &inputs);
                    write_frame(frame, out);
                }

                frames_since_snapshot += data.len() / channels;
                if frames_since_snapshot >= SNAPSHOT_INTERVAL {
                    frames_since_snapshot = 0;
                    // A full queue means the UI is behind; it only needs the latest.
                    let _ = snapshot_tx.push(Snapshot::capture(&engine, sample_rate));
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        let mut ui = UiApp::new(controls, midi_tx, snapshot_rx, initial);
        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();
        result?;

        drop(stream);
        let json = ui.snapshot().saved.to_json()?;
        std::fs::write(&self.state_path, json)
            .wrap_err_with(|| format!("failed to write {}", self.state_path.display()))?;
        info!(path = %self.state_path.display(), "saved engine state");

        Ok(())
    }
}

impl Default for DuoCv {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleave one frame onto the device: even channels carry pitch, odd
/// channels gate, one pair per bus A channel.
fn write_frame(frame: &CvFrame, out: &mut [f32]) {
    let bus = &frame.buses[0];
    for (k, sample) in out.iter_mut().enumerate() {
        let channel = k / 2;
        let volts = match (channel < CHANNELS_PER_BUS, k % 2) {
            (false, _) => 0.0,
            (true, 0) => bus.pitch.voltage(channel),
            (true, _) => bus.gate.voltage(channel),
        };
        *sample = volts / FULL_SCALE;
    }
}
