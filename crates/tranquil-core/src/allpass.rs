//! Schroeder allpass for reverb diffusion.

use crate::{DelayLine, flush_denormal};

/// Schroeder allpass filter.
///
/// Passes all frequencies at equal amplitude but smears phase, turning the
/// comb bank's discrete echoes into a dense wash.
///
/// # Example
///
/// ```rust
/// use tranquil_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// allpass.set_feedback(0.5);
///
/// let output = allpass.process(1.0);
/// assert_eq!(output, -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    /// Create a new allpass filter with the given delay size in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient. Clamped to -0.99..=0.99.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process a single sample.
    ///
    /// output = -input + delayed,
    /// delay_input = input + delayed * feedback
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.tap();
        let output = -input + delayed;
        self.delay
            .write(flush_denormal(input + delayed * self.feedback));
        output
    }

    /// Clear the allpass filter state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
