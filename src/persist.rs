//! Saving and restoring engine settings as a JSON document.
//!
//! Key names match the documents written by earlier releases, so old patches
//! load unchanged. Every key is optional on load.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{ClockDivision, EngineConfig, MpeMode, PolyMode},
    engine::MidiCv,
    error::Result,
    synth::voice::{Bus, SlotId},
    CHANNELS_PER_BUS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(rename = "channels 1", default, skip_serializing_if = "Option::is_none")]
    pub channels_a: Option<i64>,
    #[serde(rename = "channels 2", default, skip_serializing_if = "Option::is_none")]
    pub channels_b: Option<i64>,
    #[serde(rename = "polyMode", default, skip_serializing_if = "Option::is_none")]
    pub poly_mode: Option<PolyMode>,
    #[serde(rename = "mpeMode", default, skip_serializing_if = "Option::is_none")]
    pub mpe_mode: Option<MpeMode>,
    #[serde(rename = "clockDivision", default, skip_serializing_if = "Option::is_none")]
    pub clock_division: Option<ClockDivision>,
    /// Not written in MPE mode, where bend is per channel.
    #[serde(rename = "lastBend", default, skip_serializing_if = "Option::is_none")]
    pub last_bend: Option<u16>,
    #[serde(rename = "lastMod", default, skip_serializing_if = "Option::is_none")]
    pub last_mod: Option<u8>,
}

impl SavedState {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Clamp a stored channel count, warning when the document was out of range.
fn channel_count(bus: Bus, stored: i64) -> usize {
    let min = EngineConfig::min_channels(bus) as i64;
    let clamped = stored.clamp(min, CHANNELS_PER_BUS as i64);
    if clamped != stored {
        warn!(?bus, stored, clamped, "channel count out of range, clamping");
    }
    clamped as usize
}

impl MidiCv {
    /// Snapshot the settings worth keeping between sessions.
    pub fn save_state(&self) -> SavedState {
        let config = self.config();
        let master = self.performance().bank.voice(SlotId::MASTER);
        let mpe = config.is_mpe();

        SavedState {
            channels_a: Some(config.channels(Bus::A) as i64),
            channels_b: Some(config.channels(Bus::B) as i64),
            poly_mode: Some(config.poly_mode),
            mpe_mode: Some(config.mpe_mode),
            clock_division: Some(config.clock_division),
            last_bend: (!mpe).then_some(master.bend),
            last_mod: (!mpe).then_some(master.mod_wheel),
        }
    }

    /// Apply a saved document. Must not run concurrently with `tick`; hosts
    /// restore before starting the audio stream.
    pub fn restore_state(&mut self, state: &SavedState) {
        debug!(?state, "restoring engine state");

        if let Some(channels) = state.channels_a {
            self.set_channels(Bus::A, channel_count(Bus::A, channels));
        }
        if let Some(channels) = state.channels_b {
            self.set_channels(Bus::B, channel_count(Bus::B, channels));
        }
        if let Some(mode) = state.poly_mode {
            self.set_poly_mode(mode);
        }
        if let Some(mode) = state.mpe_mode {
            self.set_mpe_mode(mode);
        }
        if let Some(division) = state.clock_division {
            if division.label().is_none() {
                warn!(ticks = division.0, "clock division not offered by the menu");
            }
            self.set_clock_division(division);
        }

        if self.config().is_mpe() {
            return;
        }
        let master = self.performance_mut().bank.voice_mut(SlotId::MASTER);
        if let Some(bend) = state.last_bend {
            master.bend = bend.min(0x3fff);
        }
        if let Some(modulation) = state.last_mod {
            master.mod_wheel = modulation.min(0x7f);
        }
    }

    pub fn restore_json(&mut self, json: &str) -> Result<()> {
        let state = SavedState::from_json(json)?;
        self.restore_state(&state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, io::MidiMessage};

    #[test]
    fn writes_legacy_key_names() {
        let mut cv = MidiCv::default();
        cv.set_channels(Bus::A, 4);
        cv.process_message(MidiMessage::pitch_bend(0, 10_000));
        let json = cv.save_state().to_json().unwrap();

        assert!(json.contains("\"channels 1\":4"));
        assert!(json.contains("\"channels 2\":0"));
        assert!(json.contains("\"polyMode\":0"));
        assert!(json.contains("\"clockDivision\":24"));
        assert!(json.contains("\"lastBend\":10000"));
    }

    #[test]
    fn mpe_state_omits_shared_wheels() {
        let mut cv = MidiCv::default();
        cv.set_poly_mode(PolyMode::Mpe);
        let state = cv.save_state();

        assert_eq!(state.last_bend, None);
        assert_eq!(state.last_mod, None);
    }

    #[test]
    fn restores_settings_and_wheels() {
        let mut cv = MidiCv::default();
        cv.restore_json(
            r#"{"channels 1": 6, "channels 2": 3, "polyMode": 2, "mpeMode": 1,
                "clockDivision": 12, "lastBend": 0, "lastMod": 64}"#,
        )
        .unwrap();

        let config = cv.config();
        assert_eq!(config.channels(Bus::A), 6);
        assert_eq!(config.channels(Bus::B), 3);
        assert_eq!(config.poly_mode, PolyMode::Reset);
        assert_eq!(config.mpe_mode, MpeMode::Rotate);
        assert_eq!(config.clock_division, ClockDivision(12));

        let master = cv.performance().bank.voice(SlotId::MASTER);
        assert_eq!(master.bend, 0);
        assert_eq!(master.mod_wheel, 64);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let mut cv = MidiCv::default();
        cv.restore_json(r#"{"channels 1": 40, "channels 2": -3}"#).unwrap();

        assert_eq!(cv.config().channels(Bus::A), 16);
        assert_eq!(cv.config().channels(Bus::B), 0);
    }

    #[test]
    fn missing_keys_leave_settings_alone() {
        let mut cv = MidiCv::default();
        cv.set_channels(Bus::A, 5);
        cv.restore_json("{}").unwrap();

        assert_eq!(cv.config().channels(Bus::A), 5);
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let err = SavedState::from_json(r#"{"polyMode": 9}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn round_trip_through_json() {
        let mut cv = MidiCv::default();
        cv.set_channels(Bus::B, 2);
        cv.set_clock_division(ClockDivision(96));
        let json = cv.save_state().to_json().unwrap();

        let mut restored = MidiCv::default();
        restored.restore_json(&json).unwrap();
        assert_eq!(restored.config(), cv.config());
    }
}
