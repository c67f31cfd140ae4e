//! Coloured noise generators.
//!
//! All colours share one xorshift32 white source:
//!
//! - **White**: flat spectrum
//! - **Pink**: -3 dB/octave, Paul Kellet's economy three-pole filter
//! - **Brown**: -6 dB/octave, leaky integration of white noise
//!
//! Pink suits wind and surf texture; brown gives the low rumble of swell.

/// Noise colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoiseColor {
    /// Flat spectrum.
    #[default]
    White,
    /// Equal energy per octave.
    Pink,
    /// Integrated white noise, heavy low end.
    Brown,
}

/// Noise generator with a fixed colour.
///
/// Deterministic for a given seed, which keeps offline renders repeatable.
///
/// ```rust
/// use tranquil_synth::{NoiseColor, NoiseSource};
///
/// let mut noise = NoiseSource::new(NoiseColor::Pink);
/// let sample = noise.advance();
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct NoiseSource {
    color: NoiseColor,
    state: u32,
    seed: u32,
    // Pink filter poles
    b0: f32,
    b1: f32,
    b2: f32,
    // Brown integrator
    last: f32,
}

impl NoiseSource {
    /// Create a generator with the default seed.
    pub fn new(color: NoiseColor) -> Self {
        Self::with_seed(color, 0x12345678)
    }

    /// Create a generator with an explicit seed. A zero seed is replaced,
    /// since xorshift would stay at zero forever.
    pub fn with_seed(color: NoiseColor, seed: u32) -> Self {
        let seed = if seed == 0 { 0x12345678 } else { seed };
        Self {
            color,
            state: seed,
            seed,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            last: 0.0,
        }
    }

    /// Colour of this generator.
    pub fn color(&self) -> NoiseColor {
        self.color
    }

    /// Restart the sequence from the seed and clear filter state.
    pub fn reset(&mut self) {
        *self = Self::with_seed(self.color, self.seed);
    }

    #[inline]
    fn white(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;

        // Convert to float in [-1, 1]
        (x as i32 as f32) / (i32::MAX as f32)
    }

    /// Generate the next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let white = self.white();
        match self.color {
            NoiseColor::White => white,
            NoiseColor::Pink => {
                self.b0 = 0.99765 * self.b0 + white * 0.099_046;
                self.b1 = 0.96300 * self.b1 + white * 0.296_516_4;
                self.b2 = 0.57000 * self.b2 + white * 1.052_691_3;
                (self.b0 + self.b1 + self.b2 + white * 0.1848) * 0.25
            }
            NoiseColor::Brown => {
                self.last = (self.last + 0.02 * white) / 1.02;
                self.last * 3.5
            }
        }
    }
}
