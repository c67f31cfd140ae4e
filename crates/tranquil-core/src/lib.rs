//! Tranquil Core - timing scaffolding and DSP primitives for ambient sessions
//!
//! This crate holds the pieces every tranquil session is built from:
//!
//! ## Timing
//!
//! - [`Clock`] - Monotonic time source, with [`SystemClock`] and [`ManualClock`] (std only)
//! - [`TimerQueue`] - Cancellable deferred events, polled by their owner
//!
//! ## Parameter Ramps
//!
//! - [`LinearSmoothedParam`] - Linear ramps with explicit durations, used for fades
//!
//! ## Filters and Modulation
//!
//! - [`Processor`] - Object-safe per-sample stage trait
//! - [`StateVariableFilter`] - TPT SVF with lowpass, highpass, and bandpass taps
//! - [`Lfo`] - Low frequency oscillator
//! - [`CombFilter`] / [`AllpassFilter`] - Reverb building blocks over [`DelayLine`]
//!
//! ## Utilities
//!
//! - [`db_to_linear`], [`linear_to_db`], [`rt60_feedback`], [`octave_ratio`]
//!
//! # no_std Support
//!
//! The DSP primitives and the timer queue are `no_std` compatible (they need
//! `alloc`). The clocks require the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
#[cfg(feature = "std")]
pub mod clock;
pub mod comb;
pub mod delay;
pub mod lfo;
pub mod math;
pub mod param;
pub mod processor;
pub mod svf;
pub mod timer;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
#[cfg(feature = "std")]
pub use clock::{Clock, ManualClock, SystemClock};
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, octave_ratio, rt60_feedback, wet_dry_mix,
};
pub use param::LinearSmoothedParam;
pub use processor::Processor;
pub use svf::{StateVariableFilter, SvfOutput};
pub use timer::{TimerId, TimerQueue};
