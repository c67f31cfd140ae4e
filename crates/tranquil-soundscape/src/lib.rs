//! Tranquil Soundscape - layered ambient audio with a leak-free session lifecycle
//!
//! A soundscape is a set of layers (noise or oscillator source, a chain of
//! filters and modulators, a volume node) feeding one shared reverb. The
//! [`SoundscapeManager`] turns an on/off signal into at most one realised
//! graph at a time: it waits for the [`AudioEnvironment`] to unlock, fades
//! layers in on a stagger, fades them out, and releases every node when done.
//!
//! ## Modules
//!
//! - [`layer`] / [`preset`] - Declarative layer and soundscape descriptions, TOML presets
//! - [`nodes`] - Sources, filters, tremolo, volume ramps, and the reverb
//! - [`graph`] - The realised graph and node accounting
//! - [`environment`] - Output targets and the offline renderer
//! - [`manager`] - Session state machine
//!
//! ## Quick Start
//!
//! ```rust
//! use tranquil_core::ManualClock;
//! use tranquil_soundscape::{OfflineEnvironment, SessionState, SoundscapeManager, SoundscapeSpec};
//!
//! let clock = ManualClock::new();
//! let mut manager = SoundscapeManager::new(
//!     OfflineEnvironment::new(48000.0),
//!     clock.clone(),
//!     SoundscapeSpec::resolve("shoreline").unwrap(),
//! );
//!
//! manager.set_enabled(true);
//! manager.poll();
//!
//! let mut block = vec![0.0f32; 1024];
//! manager.environment_mut().render(&mut block);
//! ```

pub mod environment;
pub mod error;
pub mod graph;
pub mod layer;
pub mod manager;
pub mod nodes;
pub mod preset;

pub use environment::{AudioEnvironment, OfflineEnvironment, UnlockPoll, UnlockScript};
pub use error::{Result, SoundscapeError};
pub use graph::{NodeLedger, SharedGraph, SoundscapeGraph};
pub use layer::{LayerSpec, LfoShape, ModulatorSpec, Noise, Route, SourceSpec, Waveform};
pub use manager::{SessionState, SessionStatus, SoundscapeManager};
pub use preset::{BUILTIN_NAMES, ReverbSpec, SoundscapeSpec};
