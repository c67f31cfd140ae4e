//! Output backend abstraction.
//!
//! [`AudioBackend`] keeps platform audio APIs out of the session code. The
//! default implementation wraps cpal; tests substitute a backend that hands
//! the render callback back to the caller.
//!
//! Callbacks are boxed closures so the trait stays object-safe, and streams
//! come back as a type-erased [`StreamHandle`] that stops playback on drop.

use crate::Result;

/// Configuration for building an output stream.
#[derive(Debug, Clone)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Output device name filter; the system default when `None`.
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

/// Type-erased stream handle. Playback runs while the handle exists.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object, keeping it alive until drop.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Render callback, run on the audio thread with an interleaved buffer
/// (`[L0, R0, L1, R1, ...]`) to fill.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Called with a message when the stream reports an error.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// A source of output streams.
pub trait AudioBackend: Send {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Names of the available output devices.
    fn output_device_names(&self) -> Result<Vec<String>>;

    /// Open an output stream and start it. Dropping the handle stops it.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}
