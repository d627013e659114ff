pub mod config;
pub mod dsp;
pub mod engine; // Per-sample MIDI → CV engine
pub mod error;
pub mod io;
#[cfg(feature = "serde")]
pub mod persist;
pub mod synth; // Voice bank, allocation and note state

pub use config::{BendRange, ClockDivision, EngineConfig, MpeMode, PolyMode};
pub use engine::{ControlMessage, MidiCv};
pub use error::{Error, Result};
pub use io::{CvFrame, CvInputs, MidiMessage};
pub use synth::voice::{Bus, SlotId};

/// Polyphonic channels per output bus.
pub const CHANNELS_PER_BUS: usize = 16;
/// Voice slots across both buses.
pub const NUM_SLOTS: usize = 2 * CHANNELS_PER_BUS;
/// Length of every trigger pulse, in seconds.
pub const TRIGGER_DURATION: f32 = 1e-3;
