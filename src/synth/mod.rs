// Purpose: voice state, channel allocation and note/pedal handling.
// This layer sits below the engine and knows nothing about MIDI bytes or ports.

pub mod allocator;
pub mod held;
pub mod performance;
pub mod voice;

pub use allocator::ChannelAllocator;
pub use performance::Performance;
pub use voice::{Bus, SlotId, Voice, VoiceBank};
