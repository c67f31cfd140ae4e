//! Audio output targets.
//!
//! An [`AudioEnvironment`] is where a session's graph plays. It must be
//! unlocked before any node is created; unlocking may take a while (a device
//! opening, a user gesture) or fail outright, so it is requested once and then
//! polled.

use crate::graph::SharedGraph;

/// Progress of a pending unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockPoll {
    /// Still waiting.
    Pending,
    /// Output is ready; nodes may be created.
    Ready,
    /// Output could not be opened.
    Unavailable(String),
}

/// An output target that a session manager can unlock and connect to.
pub trait AudioEnvironment {
    /// Sample rate graphs should be built for.
    fn sample_rate(&self) -> f32;

    /// Interleaved output channels.
    fn channels(&self) -> usize;

    /// Begin unlocking. Calling again while pending has no extra effect.
    fn request_unlock(&mut self);

    /// Check on the unlock started by [`request_unlock`](Self::request_unlock).
    fn poll_unlock(&mut self) -> UnlockPoll;

    /// Abandon an unlock, pending or already granted but not yet connected,
    /// and release whatever it acquired.
    fn cancel_unlock(&mut self);

    /// Route `graph` to the output, replacing any previous graph.
    fn connect(&mut self, graph: SharedGraph);

    /// Stop routing any graph. The environment must drop its handle.
    fn disconnect(&mut self);
}

/// How an [`OfflineEnvironment`] answers unlock requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnlockScript {
    /// Ready on the first poll.
    #[default]
    Immediate,
    /// Pending for this many polls, then ready.
    AfterPolls(u32),
    /// Every unlock fails with this reason.
    Deny(String),
}

/// Deterministic environment that renders on demand.
///
/// Used for offline renders and to drive the manager in tests.
#[derive(Debug, Default)]
pub struct OfflineEnvironment {
    sample_rate: f32,
    channels: usize,
    script: UnlockScript,
    pending: Option<u32>,
    unlocked: bool,
    holding: bool,
    graph: Option<SharedGraph>,
    unlock_requests: usize,
    connects: usize,
}

impl OfflineEnvironment {
    /// Stereo environment at `sample_rate` that unlocks immediately.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            channels: 2,
            ..Self::default()
        }
    }

    /// Replace the unlock behaviour for subsequent requests.
    pub fn with_script(mut self, script: UnlockScript) -> Self {
        self.script = script;
        self
    }

    /// Change how later unlock requests are answered.
    pub fn set_script(&mut self, script: UnlockScript) {
        self.script = script;
    }

    /// Set the channel count.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.max(1);
        self
    }

    /// Number of times an unlock was requested while not already pending.
    pub fn unlock_requests(&self) -> usize {
        self.unlock_requests
    }

    /// Number of graphs connected so far.
    pub fn connects(&self) -> usize {
        self.connects
    }

    /// Whether a graph is currently routed to the output.
    pub fn is_connected(&self) -> bool {
        self.graph.is_some()
    }

    /// Whether the output is held open, as a device stream would be from a
    /// successful unlock until it is cancelled or disconnected.
    pub fn holds_output(&self) -> bool {
        self.holding
    }

    /// Whether an unlock is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Render interleaved frames from the connected graph, or silence.
    pub fn render(&mut self, out: &mut [f32]) {
        match &self.graph {
            Some(graph) => graph.lock().render(out, self.channels),
            None => out.fill(0.0),
        }
    }
}

impl AudioEnvironment for OfflineEnvironment {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn request_unlock(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.unlock_requests += 1;
        let polls = match self.script {
            UnlockScript::AfterPolls(n) if !self.unlocked => n,
            _ => 0,
        };
        self.pending = Some(polls);
    }

    fn poll_unlock(&mut self) -> UnlockPoll {
        let Some(remaining) = self.pending else {
            return UnlockPoll::Pending;
        };
        if let UnlockScript::Deny(reason) = &self.script {
            self.pending = None;
            return UnlockPoll::Unavailable(reason.clone());
        }
        if remaining > 0 {
            self.pending = Some(remaining - 1);
            return UnlockPoll::Pending;
        }
        self.pending = None;
        self.unlocked = true;
        self.holding = true;
        UnlockPoll::Ready
    }

    fn cancel_unlock(&mut self) {
        self.pending = None;
        if self.graph.is_none() {
            self.holding = false;
        }
    }

    fn connect(&mut self, graph: SharedGraph) {
        self.connects += 1;
        self.graph = Some(graph);
    }

    fn disconnect(&mut self) {
        self.graph = None;
        self.holding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_unlock_is_ready_on_first_poll() {
        let mut env = OfflineEnvironment::new(48000.0);
        env.request_unlock();
        env.request_unlock();
        assert_eq!(env.unlock_requests(), 1);
        assert_eq!(env.poll_unlock(), UnlockPoll::Ready);
        assert!(!env.is_pending());
    }

    #[test]
    fn delayed_unlock_counts_polls() {
        let mut env = OfflineEnvironment::new(48000.0).with_script(UnlockScript::AfterPolls(2));
        env.request_unlock();
        assert_eq!(env.poll_unlock(), UnlockPoll::Pending);
        assert_eq!(env.poll_unlock(), UnlockPoll::Pending);
        assert_eq!(env.poll_unlock(), UnlockPoll::Ready);

        // Once unlocked, later requests resolve at once
        env.request_unlock();
        assert_eq!(env.poll_unlock(), UnlockPoll::Ready);
    }

    #[test]
    fn denied_unlock_reports_reason() {
        let mut env =
            OfflineEnvironment::new(48000.0).with_script(UnlockScript::Deny("no device".into()));
        env.request_unlock();
        assert_eq!(
            env.poll_unlock(),
            UnlockPoll::Unavailable("no device".into())
        );
        assert!(!env.is_pending());
    }

    #[test]
    fn cancelled_unlock_stays_pending_forever() {
        let mut env = OfflineEnvironment::new(48000.0);
        env.request_unlock();
        env.cancel_unlock();
        assert_eq!(env.poll_unlock(), UnlockPoll::Pending);
    }

    #[test]
    fn granted_unlock_holds_output_until_released() {
        let mut env = OfflineEnvironment::new(48000.0);
        env.request_unlock();
        assert!(!env.holds_output());
        assert_eq!(env.poll_unlock(), UnlockPoll::Ready);
        assert!(env.holds_output());
        env.cancel_unlock();
        assert!(!env.holds_output());

        env.request_unlock();
        env.poll_unlock();
        env.disconnect();
        assert!(!env.holds_output());
    }

    #[test]
    fn disconnected_environment_renders_silence() {
        let mut env = OfflineEnvironment::new(48000.0);
        let mut buf = [1.0f32; 32];
        env.render(&mut buf);
        assert_eq!(buf, [0.0; 32]);
    }
}
