//! The [`Processor`] trait shared by every per-sample stage of a layer.
//!
//! Stages are mono, `f32` in and out, and must not allocate once built:
//! they run inside the render callback.

/// A mono per-sample signal stage.
///
/// Object-safe so a layer can hold its modulator chain as
/// `Vec<Box<dyn Processor + Send>>`.
///
/// # Example
///
/// ```rust
/// use tranquil_core::Processor;
///
/// struct Gain(f32);
///
/// impl Processor for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut half = Gain(0.5);
/// let mut block = [1.0, -1.0];
/// half.process_block_inplace(&mut block);
/// assert_eq!(block, [0.5, -0.5]);
/// ```
pub trait Processor {
    /// Process a single sample, advancing internal state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a buffer in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear internal state (filter history, delay contents, LFO phase)
    /// without changing parameters.
    fn reset(&mut self);
}
