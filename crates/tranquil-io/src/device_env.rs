//! [`AudioEnvironment`] backed by a real output device.
//!
//! The device renders on its own thread. The connected graph is published
//! through an [`ArcSwapOption`] that the callback loads once per buffer; when
//! the slot is empty the callback writes silence. Unlocking opens the stream,
//! disconnecting closes it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tranquil_soundscape::{AudioEnvironment, SharedGraph, SoundscapeGraph, UnlockPoll};

use crate::backend::{AudioBackend, BackendStreamConfig, StreamHandle};
use crate::cpal_backend::CpalBackend;

type GraphSlot = Arc<ArcSwapOption<Mutex<SoundscapeGraph>>>;

/// Plays the connected soundscape graph on an output device.
pub struct DeviceEnvironment<B: AudioBackend = CpalBackend> {
    backend: B,
    config: BackendStreamConfig,
    slot: GraphSlot,
    stream: Option<StreamHandle>,
    outcome: Option<UnlockPoll>,
}

impl DeviceEnvironment<CpalBackend> {
    /// Environment on the default cpal host.
    pub fn with_default_backend(config: BackendStreamConfig) -> Self {
        Self::new(CpalBackend::new(), config)
    }
}

impl<B: AudioBackend> DeviceEnvironment<B> {
    /// Environment over `backend`. No stream is opened until an unlock is
    /// requested.
    pub fn new(backend: B, config: BackendStreamConfig) -> Self {
        Self {
            backend,
            config,
            slot: Arc::new(ArcSwapOption::empty()),
            stream: None,
            outcome: None,
        }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether an output stream is open.
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether a graph is published to the callback.
    pub fn is_connected(&self) -> bool {
        self.slot.load().is_some()
    }

    fn open_stream(&mut self) -> UnlockPoll {
        let slot = Arc::clone(&self.slot);
        let channels = usize::from(self.config.channels);
        let callback = Box::new(move |data: &mut [f32]| {
            let graph = slot.load();
            match &*graph {
                Some(graph) => graph.lock().render(data, channels),
                None => data.fill(0.0),
            }
        });
        let on_error = Box::new(|message: &str| {
            tracing::error!(%message, "output stream error");
        });

        match self
            .backend
            .build_output_stream(&self.config, callback, on_error)
        {
            Ok(stream) => {
                self.stream = Some(stream);
                UnlockPoll::Ready
            }
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "output stream unavailable");
                UnlockPoll::Unavailable(e.to_string())
            }
        }
    }
}

impl<B: AudioBackend> AudioEnvironment for DeviceEnvironment<B> {
    fn sample_rate(&self) -> f32 {
        self.config.sample_rate as f32
    }

    fn channels(&self) -> usize {
        usize::from(self.config.channels)
    }

    fn request_unlock(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = if self.stream.is_some() {
            UnlockPoll::Ready
        } else {
            self.open_stream()
        };
        self.outcome = Some(outcome);
    }

    fn poll_unlock(&mut self) -> UnlockPoll {
        self.outcome.take().unwrap_or(UnlockPoll::Pending)
    }

    fn cancel_unlock(&mut self) {
        self.outcome = None;
        if !self.is_connected() {
            self.stream = None;
        }
    }

    fn connect(&mut self, graph: SharedGraph) {
        self.slot.store(Some(graph));
    }

    fn disconnect(&mut self) {
        self.slot.store(None);
        self.stream = None;
        tracing::debug!("output stream closed");
    }
}

impl<B: AudioBackend> std::fmt::Debug for DeviceEnvironment<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceEnvironment")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("streaming", &self.stream.is_some())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ErrorCallback, OutputCallback};
    use crate::{Error, Result};
    use tranquil_core::ManualClock;
    use tranquil_soundscape::{NodeLedger, SessionState, SoundscapeManager, SoundscapeSpec};

    type CallbackCell = Arc<Mutex<Option<OutputCallback>>>;

    /// Backend that hands the render callback to the test instead of a device.
    struct CapturingBackend {
        callback: CallbackCell,
        fail: bool,
    }

    impl AudioBackend for CapturingBackend {
        fn name(&self) -> &str {
            "capture"
        }

        fn output_device_names(&self) -> Result<Vec<String>> {
            Ok(vec!["capture".into()])
        }

        fn build_output_stream(
            &self,
            _config: &BackendStreamConfig,
            callback: OutputCallback,
            _error_callback: ErrorCallback,
        ) -> Result<StreamHandle> {
            if self.fail {
                return Err(Error::NoDevice);
            }
            *self.callback.lock() = Some(callback);
            Ok(StreamHandle::new(()))
        }
    }

    fn env(fail: bool) -> (DeviceEnvironment<CapturingBackend>, CallbackCell) {
        let cell = CallbackCell::default();
        let backend = CapturingBackend {
            callback: Arc::clone(&cell),
            fail,
        };
        let config = BackendStreamConfig {
            sample_rate: 8000,
            ..BackendStreamConfig::default()
        };
        (DeviceEnvironment::new(backend, config), cell)
    }

    fn run_callback(cell: &CallbackCell, buf: &mut [f32]) {
        let mut guard = cell.lock();
        let callback = guard.as_mut().expect("stream was opened");
        callback(buf);
    }

    #[test]
    fn unlock_opens_stream_once() {
        let (mut env, _) = env(false);
        assert_eq!(env.poll_unlock(), UnlockPoll::Pending);
        env.request_unlock();
        env.request_unlock();
        assert!(env.is_streaming());
        assert_eq!(env.poll_unlock(), UnlockPoll::Ready);
        assert_eq!(env.poll_unlock(), UnlockPoll::Pending);
        assert_eq!(env.sample_rate(), 8000.0);
        assert_eq!(env.channels(), 2);
    }

    #[test]
    fn failed_stream_is_unavailable() {
        let (mut env, _) = env(true);
        env.request_unlock();
        assert!(matches!(env.poll_unlock(), UnlockPoll::Unavailable(_)));
        assert!(!env.is_streaming());
    }

    #[test]
    fn callback_renders_connected_graph_then_silence() {
        let (mut env, cell) = env(false);
        env.request_unlock();
        env.poll_unlock();

        let mut buf = vec![1.0f32; 256];
        run_callback(&cell, &mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));

        let ledger = NodeLedger::new();
        let mut graph = SoundscapeGraph::build(&SoundscapeSpec::shoreline(), 8000.0, &ledger);
        graph.start();
        graph.ramp_all_to_target(0.0);
        env.connect(graph.into_shared());
        assert!(env.is_connected());

        run_callback(&cell, &mut buf);
        assert!(buf.iter().any(|&s| s != 0.0));

        env.disconnect();
        assert!(!env.is_streaming());
        run_callback(&cell, &mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));

        // The callback no longer holds the graph
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn abandoned_construction_closes_the_stream() {
        let (env, _) = env(false);
        let mut m = SoundscapeManager::new(env, ManualClock::new(), SoundscapeSpec::shoreline());

        m.set_enabled(true);
        assert!(m.environment().is_streaming());
        m.set_enabled(false);
        assert_eq!(m.poll(), SessionState::Absent);
        assert!(!m.environment().is_streaming());
        assert!(!m.environment().is_connected());
        assert_eq!(m.live_nodes(), 0);
    }

    #[test]
    fn teardown_closes_the_stream_from_any_stage() {
        let (env, _) = env(false);
        let mut m = SoundscapeManager::new(env, ManualClock::new(), SoundscapeSpec::shoreline());

        m.set_enabled(true);
        m.shutdown();
        assert!(!m.environment().is_streaming());

        m.set_enabled(true);
        assert_eq!(m.poll(), SessionState::FadingIn);
        assert!(m.environment().is_streaming());
        m.shutdown();
        assert!(!m.environment().is_streaming());
        assert_eq!(m.live_nodes(), 0);
    }
}
