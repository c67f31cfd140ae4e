//! Session lifecycle for the ambient soundscape.
//!
//! [`SoundscapeManager`] owns at most one [`AudioSession`] and moves it
//! through
//!
//! ```text
//! Absent -> Constructing -> FadingIn -> Active -> FadingOut -> Absent
//! ```
//!
//! driven by [`set_enabled`](SoundscapeManager::set_enabled) and by timers
//! fired from [`poll`](SoundscapeManager::poll). Every deferred step is a
//! cancellable timer tagged with the id of the session that scheduled it, and
//! a timer whose session is gone does nothing when it fires.
//!
//! Re-enabling during a fade-out reverses it: the same session ramps back up
//! instead of a second one being built.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tranquil_core::{Clock, TimerQueue};

use crate::environment::{AudioEnvironment, UnlockPoll};
use crate::error::{Result, SoundscapeError};
use crate::graph::{NodeLedger, SharedGraph, SoundscapeGraph};
use crate::preset::SoundscapeSpec;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session and no nodes.
    Absent,
    /// Waiting for the environment to unlock; no nodes yet.
    Constructing,
    /// Graph is connected and layers are ramping up.
    FadingIn,
    /// Every layer is at its target level.
    Active,
    /// Layers are ramping down; disposal is scheduled.
    FadingOut,
}

impl SessionState {
    /// Lowercase name for display and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Absent => "absent",
            SessionState::Constructing => "constructing",
            SessionState::FadingIn => "fading-in",
            SessionState::Active => "active",
            SessionState::FadingOut => "fading-out",
        }
    }

    /// Whether a graph exists in this state.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            SessionState::FadingIn | SessionState::Active | SessionState::FadingOut
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot of the manager for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    /// Current lifecycle state.
    pub state: SessionState,
    /// Last value passed to `set_enabled`.
    pub enabled: bool,
    /// Id of the current session, if any.
    pub session_id: Option<u64>,
    /// Preset the next (or current) session is built from.
    pub preset: String,
    /// Live audio nodes.
    pub live_nodes: usize,
    /// Last environment failure, cleared by a successful construction.
    pub last_error: Option<String>,
}

/// One realised soundscape.
#[derive(Debug)]
struct AudioSession {
    id: u64,
    graph: SharedGraph,
    state: SessionState,
    fade_in_secs: f32,
    fade_out_secs: f32,
}

#[derive(Debug)]
enum Slot {
    Absent,
    Constructing { id: u64, abandon: bool },
    Live(AudioSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    LayerOnset { session: u64, layer: usize },
    FadeInComplete { session: u64 },
    FadeOutComplete { session: u64 },
}

impl TimerEvent {
    fn session(self) -> u64 {
        match self {
            TimerEvent::LayerOnset { session, .. }
            | TimerEvent::FadeInComplete { session }
            | TimerEvent::FadeOutComplete { session } => session,
        }
    }
}

/// Deadline `value` seconds after `now`, saturating instead of overflowing.
fn after(now: Duration, value: f32) -> Duration {
    let span = Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX);
    now.saturating_add(span)
}

/// Owns the soundscape session and its timers.
///
/// All methods run on the control thread. The environment may render the
/// connected graph from another thread; it only ever sees a [`SharedGraph`].
///
/// # Example
///
/// ```rust
/// use tranquil_core::ManualClock;
/// use tranquil_soundscape::{OfflineEnvironment, SessionState, SoundscapeManager, SoundscapeSpec};
///
/// let clock = ManualClock::new();
/// let env = OfflineEnvironment::new(48000.0);
/// let mut manager = SoundscapeManager::new(env, clock.clone(), SoundscapeSpec::shoreline());
///
/// manager.set_enabled(true);
/// assert_eq!(manager.poll(), SessionState::FadingIn);
///
/// clock.advance_secs(12.0);
/// assert_eq!(manager.poll(), SessionState::Active);
///
/// manager.set_enabled(false);
/// clock.advance_secs(8.0);
/// assert_eq!(manager.poll(), SessionState::Absent);
/// assert_eq!(manager.live_nodes(), 0);
/// ```
pub struct SoundscapeManager<E: AudioEnvironment, C: Clock> {
    env: E,
    clock: C,
    spec: SoundscapeSpec,
    ledger: NodeLedger,
    timers: TimerQueue<TimerEvent>,
    slot: Slot,
    enabled: bool,
    next_id: u64,
    last_error: Option<SoundscapeError>,
}

impl<E: AudioEnvironment, C: Clock> SoundscapeManager<E, C> {
    /// Create a manager with no session.
    pub fn new(env: E, clock: C, spec: SoundscapeSpec) -> Self {
        Self {
            env,
            clock,
            spec,
            ledger: NodeLedger::new(),
            timers: TimerQueue::new(),
            slot: Slot::Absent,
            enabled: false,
            next_id: 0,
            last_error: None,
        }
    }

    /// Turn the soundscape on or off.
    ///
    /// Never fails: an environment that cannot unlock is reported through
    /// [`last_error`](Self::last_error) and retried on the next enable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    fn enable(&mut self) {
        match &mut self.slot {
            Slot::Absent => {
                self.next_id += 1;
                let id = self.next_id;
                self.slot = Slot::Constructing { id, abandon: false };
                self.env.request_unlock();
                tracing::info!(session = id, preset = %self.spec.name, "soundscape construction requested");
            }
            Slot::Constructing { id, abandon } => {
                if *abandon {
                    *abandon = false;
                    tracing::debug!(session = *id, "pending construction resumed");
                }
            }
            Slot::Live(session) => {
                if session.state != SessionState::FadingOut {
                    return;
                }
                let id = session.id;
                let fade_in = session.fade_in_secs;
                self.timers.cancel_where(|e| e.session() == id);
                session.graph.lock().ramp_all_to_target(fade_in);
                session.state = SessionState::FadingIn;
                let deadline = after(self.clock.now(), fade_in);
                self.timers
                    .schedule(deadline, TimerEvent::FadeInComplete { session: id });
                tracing::info!(session = id, "fade-out reversed");
            }
        }
    }

    fn disable(&mut self) {
        match &mut self.slot {
            Slot::Absent => {}
            Slot::Constructing { id, abandon } => {
                if !*abandon {
                    *abandon = true;
                    tracing::debug!(session = *id, "pending construction abandoned");
                }
            }
            Slot::Live(session) => {
                if session.state == SessionState::FadingOut {
                    return;
                }
                let id = session.id;
                let fade_out = session.fade_out_secs;
                self.timers.cancel_where(|e| e.session() == id);
                session.graph.lock().ramp_all_to_silence(fade_out);
                session.state = SessionState::FadingOut;
                let deadline = after(self.clock.now(), fade_out);
                self.timers
                    .schedule(deadline, TimerEvent::FadeOutComplete { session: id });
                tracing::info!(session = id, fade_out_secs = fade_out, "soundscape fading out");
            }
        }
    }

    /// Advance the session: check a pending unlock, then fire due timers in
    /// deadline order.
    pub fn poll(&mut self) -> SessionState {
        if let Slot::Constructing { id, abandon } = self.slot {
            match self.env.poll_unlock() {
                UnlockPoll::Pending => {}
                UnlockPoll::Ready if abandon => {
                    self.env.cancel_unlock();
                    self.slot = Slot::Absent;
                    tracing::debug!(session = id, "abandoned construction discarded");
                }
                UnlockPoll::Ready => self.construct(id),
                UnlockPoll::Unavailable(reason) => {
                    self.slot = Slot::Absent;
                    tracing::warn!(session = id, %reason, "audio unavailable");
                    self.last_error = Some(SoundscapeError::AudioUnavailable(reason));
                }
            }
        }

        let now = self.clock.now();
        while let Some((_, event)) = self.timers.pop_due(now) {
            self.fire(event);
        }
        self.state()
    }

    fn construct(&mut self, id: u64) {
        let mut graph = SoundscapeGraph::build(&self.spec, self.env.sample_rate(), &self.ledger);
        graph.start();

        let now = self.clock.now();
        let fade_in = self.spec.fade_in_secs;
        for (index, layer) in self.spec.layers.iter().enumerate() {
            if layer.onset_delay_secs > 0.0 {
                self.timers.schedule(
                    after(now, layer.onset_delay_secs),
                    TimerEvent::LayerOnset { session: id, layer: index },
                );
            } else {
                graph.ramp_layer_to_target(index, fade_in);
            }
        }
        self.timers.schedule(
            after(now, self.spec.fade_in_span_secs()),
            TimerEvent::FadeInComplete { session: id },
        );

        let graph = graph.into_shared();
        self.env.connect(Arc::clone(&graph));
        self.slot = Slot::Live(AudioSession {
            id,
            graph,
            state: SessionState::FadingIn,
            fade_in_secs: fade_in,
            fade_out_secs: self.spec.fade_out_secs,
        });
        self.last_error = None;
        tracing::info!(
            session = id,
            preset = %self.spec.name,
            nodes = self.ledger.live(),
            "soundscape fading in"
        );
    }

    fn fire(&mut self, event: TimerEvent) {
        let Slot::Live(session) = &mut self.slot else {
            tracing::trace!(?event, "timer fired with no live session");
            return;
        };
        if session.id != event.session() {
            tracing::trace!(?event, live = session.id, "stale timer ignored");
            return;
        }

        match (event, session.state) {
            (TimerEvent::LayerOnset { layer, .. }, SessionState::FadingIn) => {
                session
                    .graph
                    .lock()
                    .ramp_layer_to_target(layer, session.fade_in_secs);
                tracing::debug!(session = session.id, layer, "layer onset");
            }
            (TimerEvent::FadeInComplete { .. }, SessionState::FadingIn) => {
                session.state = SessionState::Active;
                tracing::info!(session = session.id, "soundscape active");
            }
            (TimerEvent::FadeOutComplete { .. }, SessionState::FadingOut) => self.dispose(),
            (event, state) => {
                tracing::trace!(?event, %state, "timer does not apply in this state");
            }
        }
    }

    /// Release the live session, if any. Runs at most once per session: the
    /// session is moved out of the slot before anything else happens.
    fn dispose(&mut self) {
        let Slot::Live(session) = std::mem::replace(&mut self.slot, Slot::Absent) else {
            return;
        };
        let id = session.id;
        self.env.disconnect();
        session.graph.lock().stop();
        drop(session);
        self.timers.cancel_where(|e| e.session() == id);
        tracing::info!(session = id, live_nodes = self.ledger.live(), "soundscape disposed");
    }

    /// Forced teardown: cancel every timer, abandon construction, and release
    /// any live graph immediately. Nothing is audible once this returns.
    pub fn shutdown(&mut self) {
        self.enabled = false;
        self.timers.clear();
        match self.slot {
            Slot::Absent => {}
            Slot::Constructing { id, .. } => {
                self.env.cancel_unlock();
                self.slot = Slot::Absent;
                tracing::info!(session = id, "construction cancelled by shutdown");
            }
            Slot::Live(_) => self.dispose(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match &self.slot {
            Slot::Absent => SessionState::Absent,
            Slot::Constructing { .. } => SessionState::Constructing,
            Slot::Live(session) => session.state,
        }
    }

    /// State, desired flag, and last error together.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state(),
            enabled: self.enabled,
            session_id: self.session_id(),
            preset: self.spec.name.clone(),
            live_nodes: self.live_nodes(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    /// Last value passed to [`set_enabled`](Self::set_enabled).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last environment failure, cleared when a session is built.
    pub fn last_error(&self) -> Option<&SoundscapeError> {
        self.last_error.as_ref()
    }

    /// Audio nodes alive right now, across every graph this manager built.
    pub fn live_nodes(&self) -> usize {
        self.ledger.live()
    }

    /// Timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Id of the constructing or live session.
    pub fn session_id(&self) -> Option<u64> {
        match &self.slot {
            Slot::Absent => None,
            Slot::Constructing { id, .. } => Some(*id),
            Slot::Live(session) => Some(session.id),
        }
    }

    /// Recipe used for the next construction.
    pub fn spec(&self) -> &SoundscapeSpec {
        &self.spec
    }

    /// Switch presets. A running session keeps its shape; the new recipe is
    /// used the next time a graph is built.
    pub fn set_spec(&mut self, spec: SoundscapeSpec) -> Result<()> {
        spec.validate()?;
        tracing::info!(preset = %spec.name, "soundscape preset selected");
        self.spec = spec;
        Ok(())
    }

    /// The output environment.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Mutable access to the output environment, e.g. to render offline.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }
}

impl<E: AudioEnvironment, C: Clock> Drop for SoundscapeManager<E, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<E: AudioEnvironment, C: Clock> fmt::Debug for SoundscapeManager<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundscapeManager")
            .field("state", &self.state())
            .field("enabled", &self.enabled)
            .field("preset", &self.spec.name)
            .field("live_nodes", &self.ledger.live())
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}
