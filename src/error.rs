//! Error types for the non-realtime edges of the engine.
//!
//! Nothing on the per-sample path returns an error; these only surface when
//! restoring a saved document or handing values to the audio thread.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "serde")]
    #[error("Malformed state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown polyphony mode: {0}")]
    InvalidPolyMode(i64),

    #[error("Unknown MPE mode: {0}")]
    InvalidMpeMode(i64),

    #[error("Control queue is full")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, Error>;
