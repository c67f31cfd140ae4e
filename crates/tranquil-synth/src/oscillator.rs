//! Audio-rate oscillators for tonal layers.
//!
//! Saw and square use PolyBLEP (Polynomial Band-Limited Step) correction at
//! their discontinuities; sine and triangle are generated directly.

use core::f32::consts::PI;
use libm::sinf;

/// Oscillator waveform types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OscillatorWaveform {
    /// Pure fundamental tone.
    #[default]
    Sine,
    /// Odd harmonics, softer than saw.
    Triangle,
    /// All harmonics, bright timbre.
    Saw,
    /// Odd harmonics, hollow timbre.
    Square,
}

/// Phase-accumulating oscillator.
///
/// ```rust
/// use tranquil_synth::{Oscillator, OscillatorWaveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(110.0);
/// osc.set_waveform(OscillatorWaveform::Triangle);
///
/// let sample = osc.advance();
/// assert!(sample.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Phase in [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample (frequency / sample_rate)
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: OscillatorWaveform,
}

impl Oscillator {
    /// Create a sine oscillator at 440 Hz.
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
            frequency: 440.0,
            waveform: OscillatorWaveform::Sine,
        };
        osc.set_frequency(440.0);
        osc
    }

    /// Set frequency in Hz. Clamped to 0..Nyquist.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.clamp(0.0, self.sample_rate * 0.5);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set waveform.
    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    /// Restart from phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample in [-1.0, 1.0].
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let phase = self.phase;
        let dt = self.phase_inc;

        let output = match self.waveform {
            OscillatorWaveform::Sine => sinf(phase * 2.0 * PI),
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0 - poly_blep(phase, dt),
            OscillatorWaveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                let mut falling = phase + 0.5;
                if falling >= 1.0 {
                    falling -= 1.0;
                }
                naive + poly_blep(phase, dt) - poly_blep(falling, dt)
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }
}

/// 2nd-order PolyBLEP residual for a unit step at phase 0.
///
/// Reference: Välimäki et al., "Antialiasing Oscillators", IEEE Signal
/// Processing Magazine, 2010.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveforms_stay_bounded() {
        for waveform in [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Triangle,
            OscillatorWaveform::Saw,
            OscillatorWaveform::Square,
        ] {
            let mut osc = Oscillator::new(48000.0);
            osc.set_frequency(220.0);
            osc.set_waveform(waveform);
            for _ in 0..4800 {
                let s = osc.advance();
                assert!(s.abs() <= 1.01, "{:?} out of range: {}", waveform, s);
            }
        }
    }

    #[test]
    fn test_sine_period() {
        let mut osc = Oscillator::new(1000.0);
        osc.set_frequency(10.0);

        let first = osc.advance();
        for _ in 0..99 {
            osc.advance();
        }
        // 100 samples at 10 Hz / 1 kHz is exactly one cycle
        assert!((osc.advance() - first).abs() < 1e-3);
    }

    #[test]
    fn test_triangle_shape() {
        let mut osc = Oscillator::new(8.0);
        osc.set_frequency(1.0);
        osc.set_waveform(OscillatorWaveform::Triangle);

        let cycle: Vec<f32> = (0..8).map(|_| osc.advance()).collect();
        assert_eq!(cycle[0], -1.0);
        assert_eq!(cycle[2], 0.0);
        assert_eq!(cycle[4], 1.0);
    }

    #[test]
    fn test_frequency_clamped_to_nyquist() {
        let mut osc = Oscillator::new(1000.0);
        osc.set_frequency(900.0);
        assert_eq!(osc.frequency(), 500.0);
    }
}
