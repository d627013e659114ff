//! Engine configuration: polyphony modes, channel counts, bend ranges and
//! clock division, plus the option tables a menu surface offers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Error, synth::voice::Bus, CHANNELS_PER_BUS};

/// How note-ons are spread over the output channels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolyMode {
    /// Cycle through the channels, skipping sounding ones.
    #[default]
    Rotate,
    /// Retrigger a channel already holding the note, else rotate.
    Reuse,
    /// Always take the lowest free channel.
    Reset,
    /// MIDI Polyphonic Expression; see [`MpeMode`].
    Mpe,
}

impl PolyMode {
    pub const ALL: [PolyMode; 4] = [Self::Rotate, Self::Reuse, Self::Reset, Self::Mpe];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rotate => "Rotate",
            Self::Reuse => "Reuse",
            Self::Reset => "Reset",
            Self::Mpe => "MPE",
        }
    }
}

impl TryFrom<i64> for PolyMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Rotate),
            1 => Ok(Self::Reuse),
            2 => Ok(Self::Reset),
            3 => Ok(Self::Mpe),
            other => Err(Error::InvalidPolyMode(other)),
        }
    }
}

impl From<PolyMode> for i64 {
    fn from(mode: PolyMode) -> Self {
        mode as i64
    }
}

/// Channel assignment used while [`PolyMode::Mpe`] is active.
///
/// Bus A channel 0 is the MPE master channel and never receives notes in the
/// allocating sub-modes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MpeMode {
    /// MIDI channel N drives bus A channel N.
    #[default]
    Direct,
    Rotate,
    Reuse,
    Reset,
}

impl MpeMode {
    pub const ALL: [MpeMode; 4] = [Self::Direct, Self::Rotate, Self::Reuse, Self::Reset];

    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Rotate => "Rotate",
            Self::Reuse => "Reuse",
            Self::Reset => "Reset",
        }
    }
}

impl TryFrom<i64> for MpeMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Direct),
            1 => Ok(Self::Rotate),
            2 => Ok(Self::Reuse),
            3 => Ok(Self::Reset),
            other => Err(Error::InvalidMpeMode(other)),
        }
    }
}

impl From<MpeMode> for i64 {
    fn from(mode: MpeMode) -> Self {
        mode as i64
    }
}

/// Slot selection policy for allocating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Rotate,
    Reuse,
    Reset,
}

/// What a note-on does, resolved from [`PolyMode`] + [`MpeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Only bus A channel 0 sounds.
    Monophonic,
    /// MPE Direct: MIDI channel is the slot.
    Direct,
    /// Allocate with `strategy`; `mpe` reserves the master slot and records
    /// the MIDI channel → slot assignment.
    Allocate { strategy: Strategy, mpe: bool },
}

/// MIDI clock ticks per divided-clock pulse (24 ticks = one quarter note).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDivision(pub u32);

impl ClockDivision {
    pub const QUARTER: Self = Self(24);

    /// Ticks per pulse, never zero.
    pub fn ticks(self) -> u32 {
        self.0.max(1)
    }

    pub fn label(self) -> Option<&'static str> {
        CLOCK_DIVISIONS
            .iter()
            .find(|(division, _)| *division == self)
            .map(|(_, label)| *label)
    }
}

impl Default for ClockDivision {
    fn default() -> Self {
        Self::QUARTER
    }
}

/// Divisions offered to the menu, coarsest first.
pub const CLOCK_DIVISIONS: [(ClockDivision, &str); 8] = [
    (ClockDivision(96), "Whole"),
    (ClockDivision(48), "Half"),
    (ClockDivision(24), "Quarter"),
    (ClockDivision(12), "8th"),
    (ClockDivision(6), "16th"),
    (ClockDivision(3), "32nd"),
    (ClockDivision(2), "12 PPQN"),
    (ClockDivision(1), "24 PPQN"),
];

/// Pitch-bend range in semitones for full wheel travel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendRange(pub f32);

impl BendRange {
    /// Volts at full wheel travel: 60 semitones span the ±5V wheel range.
    #[inline]
    pub fn scale(self) -> f32 {
        self.0 / 60.0
    }
}

impl Default for BendRange {
    fn default() -> Self {
        Self(60.0)
    }
}

/// Bend ranges offered to the menu.
pub const BEND_RANGES: [BendRange; 11] = [
    BendRange(2.0),
    BendRange(5.0),
    BendRange(7.0),
    BendRange(12.0),
    BendRange(24.0),
    BendRange(36.0),
    BendRange(48.0),
    BendRange(60.0),
    BendRange(72.0),
    BendRange(84.0),
    BendRange(96.0),
];

/// Mode controller state.
///
/// Channel counts are kept in range by [`EngineConfig::set_channels`]; the
/// fields are private so the invariants hold everywhere the engine reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    channels: [u8; 2],
    pub poly_mode: PolyMode,
    pub mpe_mode: MpeMode,
    pub clock_division: ClockDivision,
    pub bend_range_up: BendRange,
    pub bend_range_down: BendRange,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: [1, 0],
            poly_mode: PolyMode::Rotate,
            mpe_mode: MpeMode::Direct,
            clock_division: ClockDivision::QUARTER,
            bend_range_up: BendRange::default(),
            bend_range_down: BendRange::default(),
        }
    }
}

impl EngineConfig {
    /// Smallest channel count each bus accepts.
    pub fn min_channels(bus: Bus) -> usize {
        match bus {
            Bus::A => 1,
            Bus::B => 0,
        }
    }

    /// Builder form of the two mode fields.
    pub fn with_modes(mut self, poly_mode: PolyMode, mpe_mode: MpeMode) -> Self {
        self.poly_mode = poly_mode;
        self.mpe_mode = mpe_mode;
        self
    }

    /// Builder form of [`set_channels`](Self::set_channels) for both buses.
    pub fn with_channels(mut self, channels_a: usize, channels_b: usize) -> Self {
        self.set_channels(Bus::A, channels_a);
        self.set_channels(Bus::B, channels_b);
        self
    }

    pub fn channels(&self, bus: Bus) -> usize {
        self.channels[bus.index()] as usize
    }

    /// Set a bus channel count, clamped into the bus's valid range.
    /// Returns the value actually stored.
    pub fn set_channels(&mut self, bus: Bus, channels: usize) -> usize {
        let clamped = channels.clamp(Self::min_channels(bus), CHANNELS_PER_BUS);
        self.channels[bus.index()] = clamped as u8;
        clamped
    }

    pub fn is_mpe(&self) -> bool {
        self.poly_mode == PolyMode::Mpe
    }

    /// One channel on bus A and nothing on bus B.
    pub fn is_monophonic(&self) -> bool {
        self.channels(Bus::A) == 1 && self.channels(Bus::B) == 0
    }

    /// Resolve how note-ons pick a slot under the current modes.
    pub fn assignment(&self) -> Assignment {
        let (strategy, mpe) = match (self.poly_mode, self.mpe_mode) {
            (PolyMode::Mpe, MpeMode::Direct) => return Assignment::Direct,
            _ if self.is_monophonic() => return Assignment::Monophonic,
            (PolyMode::Rotate, _) => (Strategy::Rotate, false),
            (PolyMode::Reuse, _) => (Strategy::Reuse, false),
            (PolyMode::Reset, _) => (Strategy::Reset, false),
            (PolyMode::Mpe, MpeMode::Rotate) => (Strategy::Rotate, true),
            (PolyMode::Mpe, MpeMode::Reuse) => (Strategy::Reuse, true),
            (PolyMode::Mpe, MpeMode::Reset) => (Strategy::Reset, true),
        };
        Assignment::Allocate { strategy, mpe }
    }

    /// MPE Rotate parks the rotation cursor on the master slot after a panic.
    pub fn cursor_starts_on_master(&self) -> bool {
        self.poly_mode == PolyMode::Mpe && self.mpe_mode == MpeMode::Rotate
    }
}
