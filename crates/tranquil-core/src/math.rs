//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`rt60_feedback`] - Feedback gain that gives a delay loop a target decay time
//! - [`octave_ratio`] - Frequency multiplier for a span in octaves
//! - [`wet_dry_mix`] - Crossfade between dry and processed signals

use libm::{exp2f, expf, logf, powf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use tranquil_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Values at or below zero clamp to -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Feedback gain for a recirculating delay of `delay_samples` so the loop
/// decays by 60 dB in `decay_secs`.
///
/// `g = 10^(-3 * delay / (decay * sample_rate))`, clamped below 0.99 so the
/// loop always stays stable.
#[inline]
pub fn rt60_feedback(delay_samples: usize, decay_secs: f32, sample_rate: f32) -> f32 {
    if decay_secs <= 0.0 {
        return 0.0;
    }
    let exponent = -3.0 * delay_samples as f32 / (decay_secs * sample_rate);
    powf(10.0, exponent).min(0.99)
}

/// Frequency multiplier for `octaves` (2^octaves).
#[inline]
pub fn octave_ratio(octaves: f32) -> f32 {
    exp2f(octaves)
}

/// Flush subnormal floats to zero. Use in feedback loops that decay toward silence.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals: `dry + (wet - dry) * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
