/*
Exponential Smoothing
=====================

MIDI controllers arrive as stairs: a pitch wheel jumps between 14-bit steps,
a mod wheel between 7-bit steps, and messages arrive at most a few hundred
times per second. Fed straight to a CV output, every step is an audible
"zipper". A one-pole low-pass turns the stairs into a curve.

Vocabulary
----------

  tau       Time constant in seconds. After tau seconds the output has covered
            ~63% of the distance to a new target; after 5·tau, ~99%.

  lambda    1 / tau. The fraction of the remaining distance covered per second.

  dt        Elapsed time for this step (the sample period when run per sample).


The Math
--------

Each step moves the output a fixed fraction of the remaining distance:

    out += (in - out) * lambda * dt

With tau = 1/30 s at 48kHz, lambda * dt ≈ 0.000625 per sample.

Because the step is proportional to the distance, the output approaches the
target asymptotically and never overshoots (as long as lambda * dt < 1).


Snapping
--------

Near the target the step becomes smaller than one float ULP of `out`, and
`out + step == out`. Without help the output would stall a hair short of the
target forever. When a step produces no change we snap straight to the input.
*/

/// One-pole exponential low-pass used to smooth controller data.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialFilter {
    out: f32,
    lambda: f32,
}

impl ExponentialFilter {
    pub fn new(tau: f32) -> Self {
        let mut filter = Self { out: 0.0, lambda: 0.0 };
        filter.set_tau(tau);
        filter
    }

    pub fn set_tau(&mut self, tau: f32) {
        self.lambda = 1.0 / tau;
    }

    /// Advance by `delta_time` seconds towards `input` and return the new output.
    #[inline]
    pub fn process(&mut self, delta_time: f32, input: f32) -> f32 {
        let y = self.out + (input - self.out) * self.lambda * delta_time;
        if y == self.out {
            self.out = input;
        } else {
            self.out = y;
        }
        self.out
    }

    /// Drop back to 0.0.
    pub fn reset(&mut self) {
        self.out = 0.0;
    }

    pub fn value(&self) -> f32 {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

    #[test]
    fn moves_gradually_towards_target() {
        let mut filter = ExponentialFilter::new(1.0 / 30.0);
        let first = filter.process(SAMPLE_TIME, 5.0);

        assert!(first > 0.0 && first < 0.01, "first step should be small, got {first}");
    }

    #[test]
    fn settles_on_target() {
        let mut filter = ExponentialFilter::new(1.0 / 30.0);
        for _ in 0..48_000 {
            filter.process(SAMPLE_TIME, -5.0);
        }

        assert!((filter.value() + 5.0).abs() < 1e-4);
    }

    #[test]
    fn one_time_constant_covers_most_of_the_distance() {
        let tau = 0.01;
        let mut filter = ExponentialFilter::new(tau);
        for _ in 0..(tau / SAMPLE_TIME) as usize {
            filter.process(SAMPLE_TIME, 1.0);
        }

        // 1 - e^-1 ≈ 0.632
        assert!((filter.value() - 0.632).abs() < 0.01);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut filter = ExponentialFilter::new(1.0 / 30.0);
        filter.process(0.1, 3.0);
        filter.reset();

        assert_eq!(filter.value(), 0.0);
    }
}
