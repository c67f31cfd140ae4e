//! Parameter ramps for click-free level changes.
//!
//! Layer volumes never jump: every change is a linear ramp with an explicit
//! duration, so fades have a predictable end time that a session timer can
//! be scheduled against.
//!
//! ## Usage
//!
//! ```rust
//! use tranquil_core::LinearSmoothedParam;
//!
//! let mut level = LinearSmoothedParam::with_sample_rate(0.0, 48000.0);
//! level.ramp_to(1.0, 0.5); // half a second to full scale
//!
//! for _ in 0..24000 {
//!     let _gain = level.advance();
//! }
//! assert!(level.is_settled());
//! ```

/// A parameter with linear smoothing (constant rate of change).
///
/// Each [`ramp_to`](Self::ramp_to) starts a new segment from wherever the
/// value currently is, which is what makes reversing a half-finished fade
/// continuous.
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Increment per sample (can be positive or negative)
    increment: f32,
    /// Samples remaining until target reached
    samples_remaining: u32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl LinearSmoothedParam {
    /// Create a settled parameter at `initial`.
    pub fn new(initial: f32) -> Self {
        Self::with_sample_rate(initial, 44100.0)
    }

    /// Create a settled parameter at `initial` for the given sample rate.
    pub fn with_sample_rate(initial: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
        }
    }

    /// Start a linear segment from the current value to `target`, lasting
    /// `duration_secs`. A zero duration jumps immediately.
    pub fn ramp_to(&mut self, target: f32, duration_secs: f32) {
        self.target = target;

        let samples = (duration_secs.max(0.0) * self.sample_rate) as u32;
        if samples == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.samples_remaining = samples;
        }
    }

    /// Set value immediately.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Update sample rate. An in-flight segment keeps its per-sample slope.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Get next smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the current segment is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Seconds left in the current segment.
    pub fn remaining_secs(&self) -> f32 {
        self.samples_remaining as f32 / self.sample_rate
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target_in_exact_time() {
        let mut param = LinearSmoothedParam::with_sample_rate(0.0, 48000.0);
        param.ramp_to(1.0, 0.010);

        for _ in 0..480 {
            param.advance();
        }

        assert!(
            (param.get() - 1.0).abs() < 1e-5,
            "Should reach target exactly, got {}",
            param.get()
        );
        assert!(param.is_settled());
    }

    #[test]
    fn ramp_has_constant_rate() {
        let mut param = LinearSmoothedParam::with_sample_rate(0.0, 48000.0);
        param.ramp_to(1.0, 0.010);

        for _ in 0..240 {
            param.advance();
        }

        assert!(
            (param.get() - 0.5).abs() < 0.01,
            "Should be halfway, got {}",
            param.get()
        );
    }

    #[test]
    fn reversal_starts_from_current_value() {
        let mut param = LinearSmoothedParam::with_sample_rate(1.0, 1000.0);
        param.ramp_to(0.0, 1.0);
        for _ in 0..250 {
            param.advance();
        }
        let midway = param.get();
        assert!((midway - 0.75).abs() < 1e-3, "got {midway}");

        param.ramp_to(1.0, 0.5);
        let next = param.advance();
        assert!(next > midway, "reversal must continue from {midway}, got {next}");
        assert!((next - midway) < 0.01, "reversal jumped to {next}");

        for _ in 0..500 {
            param.advance();
        }
        assert_eq!(param.get(), 1.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut param = LinearSmoothedParam::with_sample_rate(0.0, 48000.0);
        param.ramp_to(0.3, 0.0);
        assert_eq!(param.get(), 0.3);
        assert!(param.is_settled());
        assert_eq!(param.remaining_secs(), 0.0);
    }
}
