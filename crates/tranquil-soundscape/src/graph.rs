//! The realised node graph of one session.
//!
//! A [`SoundscapeGraph`] is built from a [`SoundscapeSpec`] in one go: every
//! source, modulator, volume node, and the shared reverb exist from the moment
//! [`SoundscapeGraph::build`] returns until the graph is dropped. Each node
//! holds a [`NodeToken`] from a [`NodeLedger`], so the number of live nodes is
//! observable from outside and a disposed graph provably leaves nothing behind.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tranquil_core::Processor;

use crate::layer::Route;
use crate::nodes::{ReverbNode, SourceNode, VolumeNode, build_modulator};
use crate::preset::SoundscapeSpec;

/// Shared count of live audio nodes.
///
/// Clones observe the same count.
#[derive(Debug, Clone, Default)]
pub struct NodeLedger {
    live: Arc<AtomicUsize>,
}

impl NodeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new node. The node is live until the token drops.
    pub fn issue(&self) -> NodeToken {
        self.live.fetch_add(1, Ordering::AcqRel);
        NodeToken {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of nodes currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

/// Proof of one live node; releases it on drop.
#[derive(Debug)]
pub struct NodeToken {
    live: Arc<AtomicUsize>,
}

impl Drop for NodeToken {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A node paired with its ledger entry.
#[derive(Debug)]
pub struct Tracked<T> {
    node: T,
    _token: NodeToken,
}

impl<T> Tracked<T> {
    fn new(node: T, ledger: &NodeLedger) -> Self {
        Self {
            node,
            _token: ledger.issue(),
        }
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.node
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.node
    }
}

/// One realised layer.
pub struct LayerNodes {
    name: String,
    onset_delay_secs: f32,
    route: Route,
    source: Tracked<SourceNode>,
    modulators: Vec<Tracked<Box<dyn Processor + Send>>>,
    volume: Tracked<VolumeNode>,
}

impl LayerNodes {
    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delay before this layer's fade-in begins.
    pub fn onset_delay_secs(&self) -> f32 {
        self.onset_delay_secs
    }

    /// Current linear gain of the volume node.
    pub fn gain(&self) -> f32 {
        self.volume.gain()
    }

    /// Level the layer fades in to, in dB.
    pub fn target_db(&self) -> f32 {
        self.volume.target_db()
    }

    #[inline]
    fn render_sample(&mut self) -> f32 {
        let mut sample = self.source.advance();
        for stage in &mut self.modulators {
            sample = stage.process(sample);
        }
        self.volume.process(sample)
    }
}

impl std::fmt::Debug for LayerNodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerNodes")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("modulators", &self.modulators.len())
            .field("gain", &self.volume.gain())
            .finish()
    }
}

/// All layers of one session plus its shared reverb.
#[derive(Debug)]
pub struct SoundscapeGraph {
    layers: Vec<LayerNodes>,
    reverb: Tracked<ReverbNode>,
    sample_rate: f32,
    running: bool,
}

/// A graph shared between the control thread and an audio callback.
pub type SharedGraph = Arc<Mutex<SoundscapeGraph>>;

impl SoundscapeGraph {
    /// Allocate every node for `spec`. Volumes start silent and sources are
    /// stopped until [`start`](Self::start).
    pub fn build(spec: &SoundscapeSpec, sample_rate: f32, ledger: &NodeLedger) -> Self {
        let layers = spec
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let seed = 0x9E37_79B9_u32.wrapping_mul(i as u32 + 1);
                let mut volume = VolumeNode::new(sample_rate, layer.volume_db);
                volume.silence();
                LayerNodes {
                    name: layer.name.clone(),
                    onset_delay_secs: layer.onset_delay_secs,
                    route: layer.route,
                    source: Tracked::new(
                        SourceNode::build(&layer.source, sample_rate, seed),
                        ledger,
                    ),
                    modulators: layer
                        .modulators
                        .iter()
                        .map(|m| Tracked::new(build_modulator(m, sample_rate), ledger))
                        .collect(),
                    volume: Tracked::new(volume, ledger),
                }
            })
            .collect();

        let graph = Self {
            layers,
            reverb: Tracked::new(ReverbNode::new(sample_rate, &spec.reverb), ledger),
            sample_rate,
            running: false,
        };
        tracing::debug!(
            preset = %spec.name,
            layers = graph.layers.len(),
            nodes = graph.node_count(),
            sample_rate,
            "soundscape graph built"
        );
        graph
    }

    /// Wrap for sharing with an audio callback.
    pub fn into_shared(self) -> SharedGraph {
        Arc::new(Mutex::new(self))
    }

    /// Start every source and LFO.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop all sources, silence every layer, and drop the reverb tail.
    pub fn stop(&mut self) {
        self.running = false;
        for layer in &mut self.layers {
            layer.volume.silence();
            layer.source.reset();
            for stage in &mut layer.modulators {
                stage.reset();
            }
        }
        self.reverb.clear();
    }

    /// Whether sources are running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Sample rate the graph was built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Realised layers, in spec order.
    pub fn layers(&self) -> &[LayerNodes] {
        &self.layers
    }

    /// Number of nodes this graph holds, reverb included.
    pub fn node_count(&self) -> usize {
        1 + self
            .layers
            .iter()
            .map(|l| 2 + l.modulators.len())
            .sum::<usize>()
    }

    /// Ramp one layer from its current gain to its target. Returns false for
    /// an unknown index.
    pub fn ramp_layer_to_target(&mut self, index: usize, secs: f32) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.volume.ramp_to_target(secs);
                true
            }
            None => false,
        }
    }

    /// Ramp every layer to its target at once.
    pub fn ramp_all_to_target(&mut self, secs: f32) {
        for layer in &mut self.layers {
            layer.volume.ramp_to_target(secs);
        }
    }

    /// Ramp every layer to silence.
    pub fn ramp_all_to_silence(&mut self, secs: f32) {
        for layer in &mut self.layers {
            layer.volume.ramp_to_silence(secs);
        }
    }

    /// Whether every layer has reached silence.
    pub fn is_silent(&self) -> bool {
        self.layers.iter().all(|l| l.volume.gain() == 0.0)
    }

    /// Render interleaved frames into `out`.
    ///
    /// Mono output folds the stereo reverb; channels beyond two get silence.
    /// A stopped graph renders silence.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        if !self.running || channels == 0 {
            out.fill(0.0);
            return;
        }

        for frame in out.chunks_mut(channels) {
            let mut bus = 0.0f32;
            let mut direct = 0.0f32;
            for layer in &mut self.layers {
                let sample = layer.render_sample();
                match layer.route {
                    Route::Reverb => bus += sample,
                    Route::Direct => direct += sample,
                }
            }
            let (l, r) = self.reverb.process(bus);
            let (l, r) = (l + direct, r + direct);

            match frame {
                [mono] => *mono = 0.5 * (l + r),
                [left, right, rest @ ..] => {
                    *left = l;
                    *right = r;
                    rest.fill(0.0);
                }
                [] => {}
            }
        }
    }
}
