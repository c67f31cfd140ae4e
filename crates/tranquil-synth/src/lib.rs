//! Tranquil Synth - sound sources for soundscape layers
//!
//! - [`NoiseSource`] / [`NoiseColor`] - White, pink, and brown noise
//! - [`Oscillator`] / [`OscillatorWaveform`] - Tonal sources with PolyBLEP
//!
//! ```rust
//! use tranquil_synth::{NoiseColor, NoiseSource, Oscillator};
//!
//! let mut surf = NoiseSource::new(NoiseColor::Brown);
//! let mut drone = Oscillator::new(48000.0);
//! drone.set_frequency(55.0);
//!
//! let mixed = 0.5 * surf.advance() + 0.5 * drone.advance();
//! assert!(mixed.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod noise;
pub mod oscillator;

pub use noise::{NoiseColor, NoiseSource};
pub use oscillator::{Oscillator, OscillatorWaveform};
