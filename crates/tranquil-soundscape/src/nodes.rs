//! Realised audio nodes.
//!
//! Each node is one stage of a layer's signal chain (or the session's shared
//! reverb) with its state allocated up front. Nodes never allocate while
//! rendering.

use tranquil_core::{
    AllpassFilter, CombFilter, LfoWaveform, LinearSmoothedParam, Lfo, Processor,
    StateVariableFilter, SvfOutput, db_to_linear, octave_ratio, rt60_feedback, wet_dry_mix,
};
use tranquil_synth::{NoiseSource, Oscillator};

use crate::layer::{ModulatorSpec, SourceSpec};
use crate::preset::ReverbSpec;

/// A layer's sound source.
#[derive(Debug, Clone)]
pub enum SourceNode {
    /// Coloured noise.
    Noise(NoiseSource),
    /// Pitched oscillator.
    Tone(Oscillator),
}

impl SourceNode {
    /// Build a source. `seed` decorrelates layers that share a noise colour.
    pub fn build(spec: &SourceSpec, sample_rate: f32, seed: u32) -> Self {
        match *spec {
            SourceSpec::Noise { color } => {
                SourceNode::Noise(NoiseSource::with_seed(color.into(), seed))
            }
            SourceSpec::Oscillator {
                waveform,
                frequency_hz,
            } => {
                let mut osc = Oscillator::new(sample_rate);
                osc.set_waveform(waveform.into());
                osc.set_frequency(frequency_hz);
                SourceNode::Tone(osc)
            }
        }
    }

    /// Rewind to the initial state.
    pub fn reset(&mut self) {
        match self {
            SourceNode::Noise(noise) => noise.reset(),
            SourceNode::Tone(osc) => osc.reset(),
        }
    }

    /// Next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self {
            SourceNode::Noise(noise) => noise.advance(),
            SourceNode::Tone(osc) => osc.advance(),
        }
    }
}

/// Lowpass whose cutoff is swept by an LFO.
///
/// The LFO position maps to `base × 2^(octaves × u)` with
/// `u = 0.5 + 0.5 × depth × lfo`, so a depth of 1 covers the full span.
#[derive(Debug, Clone)]
pub struct AutoFilter {
    filter: StateVariableFilter,
    lfo: Lfo,
    depth: f32,
    base_hz: f32,
    octaves: f32,
}

impl AutoFilter {
    /// Create an auto-filter.
    pub fn new(sample_rate: f32, rate_hz: f32, depth: f32, base_hz: f32, octaves: f32) -> Self {
        let mut filter = StateVariableFilter::new(sample_rate);
        filter.set_cutoff(base_hz);
        Self {
            filter,
            lfo: Lfo::new(sample_rate, rate_hz),
            depth: depth.clamp(0.0, 1.0),
            base_hz,
            octaves,
        }
    }

    /// Set the LFO shape.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.lfo.set_waveform(waveform);
    }

    /// Cutoff used for the last processed sample.
    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }
}

impl Processor for AutoFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let u = 0.5 + 0.5 * self.depth * self.lfo.next();
        self.filter
            .set_cutoff(self.base_hz * octave_ratio(self.octaves * u));
        self.filter.process(input)
    }

    fn reset(&mut self) {
        self.filter.reset();
        self.lfo.reset();
    }
}

/// Slow amplitude modulation.
#[derive(Debug, Clone)]
pub struct Tremolo {
    lfo: Lfo,
    depth: f32,
}

impl Tremolo {
    /// Create a tremolo. Gain swings between `1 - depth` and 1.
    pub fn new(sample_rate: f32, rate_hz: f32, depth: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, rate_hz),
            depth: depth.clamp(0.0, 1.0),
        }
    }

    /// Set the LFO shape.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.lfo.set_waveform(waveform);
    }
}

impl Processor for Tremolo {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let gain = 1.0 - self.depth * (1.0 - self.lfo.next_unipolar());
        input * gain
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

fn static_filter(sample_rate: f32, output: SvfOutput, frequency_hz: f32, q: f32) -> StateVariableFilter {
    let mut svf = StateVariableFilter::new(sample_rate);
    svf.set_output_type(output);
    svf.set_cutoff(frequency_hz);
    svf.set_resonance(q);
    svf
}

/// Build the processor for one modulator stage.
pub fn build_modulator(spec: &ModulatorSpec, sample_rate: f32) -> Box<dyn Processor + Send> {
    match *spec {
        ModulatorSpec::Lowpass { frequency_hz, q } => Box::new(static_filter(
            sample_rate,
            SvfOutput::Lowpass,
            frequency_hz,
            q,
        )),
        ModulatorSpec::Highpass { frequency_hz, q } => Box::new(static_filter(
            sample_rate,
            SvfOutput::Highpass,
            frequency_hz,
            q,
        )),
        ModulatorSpec::Bandpass { frequency_hz, q } => Box::new(static_filter(
            sample_rate,
            SvfOutput::Bandpass,
            frequency_hz,
            q,
        )),
        ModulatorSpec::AutoFilter {
            rate_hz,
            depth,
            base_hz,
            octaves,
            shape,
        } => {
            let mut auto = AutoFilter::new(sample_rate, rate_hz, depth, base_hz, octaves);
            auto.set_waveform(shape.into());
            Box::new(auto)
        }
        ModulatorSpec::Tremolo {
            rate_hz,
            depth,
            shape,
        } => {
            let mut tremolo = Tremolo::new(sample_rate, rate_hz, depth);
            tremolo.set_waveform(shape.into());
            Box::new(tremolo)
        }
    }
}

/// Layer gain stage. Starts silent; all level changes are linear ramps.
#[derive(Debug, Clone)]
pub struct VolumeNode {
    gain: LinearSmoothedParam,
    target_db: f32,
}

impl VolumeNode {
    /// A silent volume node that fades toward `target_db` when asked.
    pub fn new(sample_rate: f32, target_db: f32) -> Self {
        Self {
            gain: LinearSmoothedParam::with_sample_rate(0.0, sample_rate),
            target_db,
        }
    }

    /// Level the layer fades in to.
    pub fn target_db(&self) -> f32 {
        self.target_db
    }

    /// Jump to silence.
    pub fn silence(&mut self) {
        self.gain.set_immediate(0.0);
    }

    /// Ramp from the current gain to the layer's target level.
    pub fn ramp_to_target(&mut self, secs: f32) {
        self.gain.ramp_to(db_to_linear(self.target_db), secs);
    }

    /// Ramp from the current gain to silence.
    pub fn ramp_to_silence(&mut self, secs: f32) {
        self.gain.ramp_to(0.0, secs);
    }

    /// Current linear gain.
    pub fn gain(&self) -> f32 {
        self.gain.get()
    }

    /// Whether the current ramp has finished.
    pub fn is_settled(&self) -> bool {
        self.gain.is_settled()
    }

    /// Apply the gain to one sample, advancing the ramp.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        input * self.gain.advance()
    }
}

/// Freeverb comb delays at 44.1 kHz; mutually prime.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass delays at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Right-channel offset for stereo decorrelation.
const STEREO_SPREAD: usize = 23;

const REFERENCE_RATE: f32 = 44100.0;

fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE).round() as usize).max(1)
}

#[derive(Debug, Clone)]
struct Tank {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Tank {
    fn new(sample_rate: f32, spread: usize, spec: &ReverbSpec) -> Self {
        let combs = core::array::from_fn(|i| {
            let len = scale_to_rate(COMB_TUNINGS_44K[i] + spread, sample_rate);
            let mut comb = CombFilter::new(len);
            comb.set_feedback(rt60_feedback(len, spec.decay_secs, sample_rate));
            comb.set_damp(spec.damping);
            comb
        });
        let allpasses = core::array::from_fn(|i| {
            let len = scale_to_rate(ALLPASS_TUNINGS_44K[i] + spread, sample_rate);
            let mut ap = AllpassFilter::new(len);
            ap.set_feedback(0.5);
            ap
        });
        Self { combs, allpasses }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut sum = 0.0f32;
        for comb in &mut self.combs {
            sum += comb.process(input);
        }
        let mut diffused = sum * 0.125;
        for allpass in &mut self.allpasses {
            diffused = allpass.process(diffused);
        }
        diffused
    }

    fn clear(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::clear);
        self.allpasses.iter_mut().for_each(AllpassFilter::clear);
    }
}

/// Shared stereo reverb. One per session; every reverb-routed layer feeds it.
///
/// Freeverb topology, with each comb's feedback derived from the requested
/// decay time instead of an abstract room size.
#[derive(Debug, Clone)]
pub struct ReverbNode {
    left: Tank,
    right: Tank,
    wet: f32,
}

impl ReverbNode {
    /// Create a reverb for `spec`.
    pub fn new(sample_rate: f32, spec: &ReverbSpec) -> Self {
        Self {
            left: Tank::new(sample_rate, 0, spec),
            right: Tank::new(sample_rate, STEREO_SPREAD, spec),
            wet: spec.wet.clamp(0.0, 1.0),
        }
    }

    /// Wet/dry balance.
    pub fn wet(&self) -> f32 {
        self.wet
    }

    /// Process one mono bus sample into a stereo pair.
    #[inline]
    pub fn process(&mut self, input: f32) -> (f32, f32) {
        let l = self.left.process(input);
        let r = self.right.process(input);
        (
            wet_dry_mix(input, l, self.wet),
            wet_dry_mix(input, r, self.wet),
        )
    }

    /// Drop the tail.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LfoShape, Noise, Waveform};

    #[test]
    fn volume_starts_silent_and_ramps_to_target() {
        let mut volume = VolumeNode::new(1000.0, -40.0);
        assert_eq!(volume.gain(), 0.0);
        assert_eq!(volume.process(1.0), 0.0);

        volume.ramp_to_target(1.0);
        for _ in 0..1000 {
            volume.process(1.0);
        }
        assert!((volume.gain() - 0.01).abs() < 1e-5);
        assert!(volume.is_settled());

        volume.ramp_to_silence(0.5);
        for _ in 0..500 {
            volume.process(1.0);
        }
        assert_eq!(volume.gain(), 0.0);
    }

    #[test]
    fn tremolo_gain_stays_in_range() {
        let mut tremolo = Tremolo::new(1000.0, 2.0, 0.7);
        for _ in 0..2000 {
            let out = tremolo.process(1.0);
            assert!((0.3 - 1e-4..=1.0 + 1e-4).contains(&out), "gain {out}");
        }
    }

    #[test]
    fn auto_filter_sweeps_its_span() {
        let mut auto = AutoFilter::new(48000.0, 1.0, 1.0, 200.0, 2.5);
        let mut lo = f32::MAX;
        let mut hi = 0.0f32;
        for _ in 0..48000 {
            auto.process(0.0);
            lo = lo.min(auto.cutoff());
            hi = hi.max(auto.cutoff());
        }
        assert!(lo < 210.0, "lowest cutoff {lo}");
        assert!(hi > 200.0 * 5.5, "highest cutoff {hi}");
    }

    #[test]
    fn reverb_tail_decays() {
        let spec = ReverbSpec {
            decay_secs: 0.5,
            wet: 1.0,
            damping: 0.3,
        };
        let mut reverb = ReverbNode::new(8000.0, &spec);
        reverb.process(1.0);

        let mut early = 0.0f32;
        for _ in 0..2000 {
            let (l, r) = reverb.process(0.0);
            early = early.max(l.abs()).max(r.abs());
        }
        assert!(early > 0.0);

        for _ in 0..20000 {
            reverb.process(0.0);
        }
        let (l, r) = reverb.process(0.0);
        assert!(l.abs() < 1e-3 && r.abs() < 1e-3, "tail still at {l}, {r}");
    }

    #[test]
    fn dry_reverb_passes_input() {
        let spec = ReverbSpec {
            decay_secs: 4.0,
            wet: 0.0,
            damping: 0.3,
        };
        let mut reverb = ReverbNode::new(44100.0, &spec);
        assert_eq!(reverb.process(0.25), (0.25, 0.25));
    }

    #[test]
    fn modulators_build_for_every_kind() {
        let kinds = [
            ModulatorSpec::Lowpass {
                frequency_hz: 150.0,
                q: 0.707,
            },
            ModulatorSpec::Bandpass {
                frequency_hz: 500.0,
                q: 1.0,
            },
            ModulatorSpec::AutoFilter {
                rate_hz: 0.08,
                depth: 0.6,
                base_hz: 200.0,
                octaves: 2.5,
                shape: LfoShape::Sine,
            },
            ModulatorSpec::Tremolo {
                rate_hz: 0.05,
                depth: 0.7,
                shape: LfoShape::Triangle,
            },
        ];
        let mut source = SourceNode::build(&SourceSpec::Noise { color: Noise::Pink }, 48000.0, 7);
        for kind in &kinds {
            let mut stage = build_modulator(kind, 48000.0);
            for _ in 0..4800 {
                assert!(stage.process(source.advance()).is_finite());
            }
        }
    }

    #[test]
    fn tone_source_follows_spec() {
        let spec = SourceSpec::Oscillator {
            waveform: Waveform::Sine,
            frequency_hz: 110.0,
        };
        let mut tone = SourceNode::build(&spec, 48000.0, 1);
        let peak = (0..48000).map(|_| tone.advance().abs()).fold(0.0f32, f32::max);
        assert!(peak > 0.9 && peak <= 1.01, "peak {peak}");
    }
}
