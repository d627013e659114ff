//! One-shot trigger pulses (retrigger, clock, transport).

/// Goes high for a fixed time after [`trigger`](Self::trigger), then low.
///
/// Retriggering while high extends the pulse rather than restarting a
/// shorter one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseGenerator {
    remaining: f32,
}

impl PulseGenerator {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Keep the output high for at least `duration` seconds from now.
    pub fn trigger(&mut self, duration: f32) {
        if duration > self.remaining {
            self.remaining = duration;
        }
    }

    /// Advance by `delta_time` seconds. Returns whether the pulse was high for this step.
    #[inline]
    pub fn process(&mut self, delta_time: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= delta_time;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_high(&self) -> bool {
        self.remaining > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TIME: f32 = 1.0 / 1_000.0;

    #[test]
    fn idle_generator_stays_low() {
        let mut pulse = PulseGenerator::new();
        assert!(!pulse.process(SAMPLE_TIME));
    }

    #[test]
    fn pulse_lasts_for_its_duration() {
        let mut pulse = PulseGenerator::new();
        pulse.trigger(5.0 * SAMPLE_TIME);

        let high = (0..20).filter(|_| pulse.process(SAMPLE_TIME)).count();
        assert!((5..=6).contains(&high), "expected ~5 high steps, got {high}");
        assert!(!pulse.is_high());
    }

    #[test]
    fn shorter_retrigger_does_not_truncate() {
        let mut pulse = PulseGenerator::new();
        pulse.trigger(10.0 * SAMPLE_TIME);
        pulse.process(SAMPLE_TIME);
        pulse.trigger(SAMPLE_TIME);

        let high = (0..20).filter(|_| pulse.process(SAMPLE_TIME)).count();
        assert!(high >= 8);
    }
}
