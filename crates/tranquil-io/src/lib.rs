//! Audio output for tranquil soundscapes.
//!
//! This crate provides:
//!
//! - **Device output**: [`DeviceEnvironment`], an [`AudioEnvironment`] that
//!   plays the connected graph on a real output device through an
//!   [`AudioBackend`] (cpal by default)
//! - **WAV files**: [`WavSink`] for streaming offline renders to disk, and
//!   [`read_wav`] / [`read_wav_info`] for checking them
//!
//! [`AudioEnvironment`]: tranquil_soundscape::AudioEnvironment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tranquil_core::SystemClock;
//! use tranquil_io::DeviceEnvironment;
//! use tranquil_soundscape::{SoundscapeManager, SoundscapeSpec};
//!
//! let env = DeviceEnvironment::with_default_backend(Default::default());
//! let mut manager = SoundscapeManager::new(env, SystemClock::new(), SoundscapeSpec::shoreline());
//! manager.set_enabled(true);
//! loop {
//!     manager.poll();
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! ```

pub mod backend;
pub mod cpal_backend;
mod device_env;
mod wav;

pub use backend::{AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle};
pub use cpal_backend::CpalBackend;
pub use device_env::DeviceEnvironment;
pub use wav::{WavInfo, WavSink, WavSpec, read_wav, read_wav_info};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
