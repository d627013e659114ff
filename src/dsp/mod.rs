//! Low-level control-rate primitives used by the voice bank and transport.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. Both advance by an explicit elapsed
//! time so the caller decides the sample period.

/// Timed one-shot trigger generator.
pub mod pulse;
/// One-pole exponential smoothing for stepped controller data.
pub mod smoothing;

pub use pulse::PulseGenerator;
pub use smoothing::ExponentialFilter;

/// Linearly map `x` from `[x_min, x_max]` onto `[y_min, y_max]`.
///
/// No clamping: values outside the input range extrapolate.
#[inline]
pub fn rescale(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    y_min + (x - x_min) / (x_max - x_min) * (y_max - y_min)
}
