//! Fixed-length delay line.
//!
//! A circular buffer whose tap always sits exactly `len` samples behind the
//! write head. Reverb combs and allpasses use it with lengths fixed at
//! construction.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Delay line using a circular buffer (heap-allocated once).
///
/// # Example
///
/// ```rust
/// use tranquil_core::DelayLine;
///
/// let mut delay = DelayLine::new(3);
/// for x in [1.0, 2.0, 3.0] {
///     assert_eq!(delay.tap(), 0.0);
///     delay.write(x);
/// }
/// assert_eq!(delay.tap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line of `len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "delay length must be > 0");
        Self {
            buffer: vec![0.0; len],
            write_pos: 0,
        }
    }

    /// The sample written `len` writes ago.
    #[inline]
    pub fn tap(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Write one sample, advancing the head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false: a delay line holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
