//! Configuration changes from other threads.
//!
//! A UI never touches the engine directly. It sends `ControlMessage` values
//! through a wait-free ring buffer; the engine applies them at the top of its
//! next tick.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
#[cfg(feature = "rtrb")]
use tracing::debug;

use crate::{
    config::{BendRange, ClockDivision, MpeMode, PolyMode},
    synth::voice::Bus,
};
#[cfg(feature = "rtrb")]
use crate::error::{Error, Result};

/// Commands sent from a UI thread to the audio thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    SetChannels(Bus, usize),
    SetPolyMode(PolyMode),
    SetMpeMode(MpeMode),
    SetClockDivision(ClockDivision),
    SetBendRangeUp(BendRange),
    SetBendRangeDown(BendRange),
    /// Silence everything, keep the configuration.
    Panic,
    /// Back to default configuration, then panic.
    Reset,
}

/// Sending half of the control queue.
#[cfg(feature = "rtrb")]
pub struct ControlHandle {
    tx: Producer<ControlMessage>,
}

#[cfg(feature = "rtrb")]
impl ControlHandle {
    /// Queue `msg` for the audio thread. Fails if the engine has fallen
    /// behind by `capacity` messages.
    pub fn send(&mut self, msg: ControlMessage) -> Result<()> {
        debug!(?msg, "queueing control message");
        self.tx.push(msg).map_err(|_| Error::QueueFull)
    }

    pub fn panic(&mut self) -> Result<()> {
        self.send(ControlMessage::Panic)
    }
}

/// Create a control queue holding up to `capacity` pending messages.
#[cfg(feature = "rtrb")]
pub fn control_channel(capacity: usize) -> (ControlHandle, Consumer<ControlMessage>) {
    let (tx, rx) = RingBuffer::new(capacity);
    (ControlHandle { tx }, rx)
}
