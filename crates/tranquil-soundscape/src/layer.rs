//! Declarative layer descriptions.
//!
//! A layer is pure topology: a source, an ordered modulator chain, a target
//! level, and a route. Nothing here allocates audio nodes; see
//! [`crate::graph`] for the realised form.

use serde::{Deserialize, Serialize};
use tranquil_core::LfoWaveform;
use tranquil_synth::{NoiseColor, OscillatorWaveform};

/// Upper bound for fades and onset delays, in seconds.
pub(crate) const MAX_TIMING_SECS: f32 = 3600.0;

/// Noise colour as written in preset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Noise {
    /// Flat spectrum.
    White,
    /// -3 dB/octave.
    Pink,
    /// -6 dB/octave.
    Brown,
}

impl From<Noise> for NoiseColor {
    fn from(noise: Noise) -> Self {
        match noise {
            Noise::White => NoiseColor::White,
            Noise::Pink => NoiseColor::Pink,
            Noise::Brown => NoiseColor::Brown,
        }
    }
}

/// Oscillator shape as written in preset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// Pure tone.
    Sine,
    /// Soft odd harmonics.
    Triangle,
    /// Bright, all harmonics.
    Saw,
    /// Hollow, odd harmonics.
    Square,
}

impl From<Waveform> for OscillatorWaveform {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => OscillatorWaveform::Sine,
            Waveform::Triangle => OscillatorWaveform::Triangle,
            Waveform::Saw => OscillatorWaveform::Saw,
            Waveform::Square => OscillatorWaveform::Square,
        }
    }
}

/// LFO shape for modulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfoShape {
    /// Smooth swell.
    #[default]
    Sine,
    /// Linear rise and fall.
    Triangle,
}

impl From<LfoShape> for LfoWaveform {
    fn from(shape: LfoShape) -> Self {
        match shape {
            LfoShape::Sine => LfoWaveform::Sine,
            LfoShape::Triangle => LfoWaveform::Triangle,
        }
    }
}

/// Where a layer's sound comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Coloured noise.
    Noise {
        /// Noise colour.
        color: Noise,
    },
    /// A pitched oscillator.
    Oscillator {
        /// Oscillator shape.
        waveform: Waveform,
        /// Pitch in Hz.
        frequency_hz: f32,
    },
}

fn default_q() -> f32 {
    0.707
}

/// One stage of a layer's modulator chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModulatorSpec {
    /// Static lowpass filter.
    Lowpass {
        /// Cutoff in Hz.
        frequency_hz: f32,
        /// Resonance.
        #[serde(default = "default_q")]
        q: f32,
    },
    /// Static highpass filter.
    Highpass {
        /// Cutoff in Hz.
        frequency_hz: f32,
        /// Resonance.
        #[serde(default = "default_q")]
        q: f32,
    },
    /// Static bandpass filter.
    Bandpass {
        /// Centre frequency in Hz.
        frequency_hz: f32,
        /// Resonance.
        #[serde(default = "default_q")]
        q: f32,
    },
    /// Lowpass whose cutoff an LFO sweeps across `octaves` above `base_hz`.
    AutoFilter {
        /// LFO rate in Hz.
        rate_hz: f32,
        /// Portion of the octave span the LFO covers, 0..=1.
        depth: f32,
        /// Lowest cutoff in Hz.
        base_hz: f32,
        /// Span of the sweep.
        octaves: f32,
        /// LFO shape.
        #[serde(default)]
        shape: LfoShape,
    },
    /// Periodic amplitude swell.
    Tremolo {
        /// LFO rate in Hz.
        rate_hz: f32,
        /// Modulation depth, 0..=1.
        depth: f32,
        /// LFO shape.
        #[serde(default)]
        shape: LfoShape,
    },
}

/// Layer output destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Through the session's shared reverb.
    #[default]
    Reverb,
    /// Straight to the output, dry.
    Direct,
}

/// A named signal chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Display name.
    pub name: String,
    /// Sound source.
    pub source: SourceSpec,
    /// Processing stages, applied in order.
    #[serde(default)]
    pub modulators: Vec<ModulatorSpec>,
    /// Level once faded in, in dB.
    pub volume_db: f32,
    /// Delay before this layer's fade-in ramp starts.
    #[serde(default)]
    pub onset_delay_secs: f32,
    /// Destination.
    #[serde(default)]
    pub route: Route,
}

impl LayerSpec {
    /// A layer with no modulators, routed to the reverb, starting at once.
    pub fn new(name: impl Into<String>, source: SourceSpec, volume_db: f32) -> Self {
        Self {
            name: name.into(),
            source,
            modulators: Vec::new(),
            volume_db,
            onset_delay_secs: 0.0,
            route: Route::Reverb,
        }
    }

    /// Append a modulator.
    pub fn with_modulator(mut self, modulator: ModulatorSpec) -> Self {
        self.modulators.push(modulator);
        self
    }

    /// Delay the fade-in.
    pub fn with_onset_delay(mut self, secs: f32) -> Self {
        self.onset_delay_secs = secs;
        self
    }

    /// Set the route.
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Problems with this layer, if any.
    pub(crate) fn check(&self) -> Result<(), String> {
        let name = &self.name;
        if name.trim().is_empty() {
            return Err("layer with empty name".into());
        }
        if !self.volume_db.is_finite() || self.volume_db > 12.0 {
            return Err(format!("layer '{name}': volume_db must be finite and <= 12"));
        }
        if !(0.0..=MAX_TIMING_SECS).contains(&self.onset_delay_secs) {
            return Err(format!(
                "layer '{name}': onset_delay_secs must be in 0..={MAX_TIMING_SECS}"
            ));
        }
        if let SourceSpec::Oscillator { frequency_hz, .. } = self.source
            && !(frequency_hz > 0.0 && frequency_hz.is_finite())
        {
            return Err(format!("layer '{name}': oscillator frequency must be > 0"));
        }

        for modulator in &self.modulators {
            let ok = match *modulator {
                ModulatorSpec::Lowpass { frequency_hz, q }
                | ModulatorSpec::Highpass { frequency_hz, q }
                | ModulatorSpec::Bandpass { frequency_hz, q } => frequency_hz > 0.0 && q > 0.0,
                ModulatorSpec::AutoFilter {
                    rate_hz,
                    depth,
                    base_hz,
                    octaves,
                    ..
                } => {
                    rate_hz >= 0.0
                        && (0.0..=1.0).contains(&depth)
                        && base_hz > 0.0
                        && (0.0..=10.0).contains(&octaves)
                }
                ModulatorSpec::Tremolo { rate_hz, depth, .. } => {
                    rate_hz >= 0.0 && (0.0..=1.0).contains(&depth)
                }
            };
            if !ok {
                return Err(format!("layer '{name}': bad modulator {modulator:?}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_parses_from_toml() {
        let layer: LayerSpec = toml::from_str(
            r#"
            name = "swell"
            volume_db = -42.0
            onset_delay_secs = 2.0
            source = { kind = "noise", color = "brown" }
            modulators = [
                { type = "tremolo", rate_hz = 0.05, depth = 0.7 },
                { type = "lowpass", frequency_hz = 150.0 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(layer.source, SourceSpec::Noise { color: Noise::Brown });
        assert_eq!(layer.route, Route::Reverb);
        assert_eq!(
            layer.modulators[0],
            ModulatorSpec::Tremolo {
                rate_hz: 0.05,
                depth: 0.7,
                shape: LfoShape::Sine
            }
        );
        assert_eq!(
            layer.modulators[1],
            ModulatorSpec::Lowpass {
                frequency_hz: 150.0,
                q: 0.707
            }
        );
        assert!(layer.check().is_ok());
    }

    #[test]
    fn oscillator_layer_parses() {
        let layer: LayerSpec = toml::from_str(
            r#"
            name = "root"
            volume_db = -30.0
            route = "direct"
            source = { kind = "oscillator", waveform = "triangle", frequency_hz = 55.0 }
            "#,
        )
        .unwrap();
        assert_eq!(layer.route, Route::Direct);
        assert!(layer.modulators.is_empty());
        assert_eq!(layer.onset_delay_secs, 0.0);
    }

    #[test]
    fn check_rejects_bad_values() {
        let noise = SourceSpec::Noise { color: Noise::Pink };
        assert!(LayerSpec::new("", noise, -20.0).check().is_err());
        assert!(LayerSpec::new("a", noise, f32::NAN).check().is_err());
        assert!(
            LayerSpec::new("a", noise, -20.0)
                .with_onset_delay(-1.0)
                .check()
                .is_err()
        );
        assert!(
            LayerSpec::new("a", noise, -20.0)
                .with_onset_delay(1e30)
                .check()
                .is_err()
        );
        assert!(
            LayerSpec::new("a", noise, -20.0)
                .with_modulator(ModulatorSpec::Tremolo {
                    rate_hz: 0.1,
                    depth: 1.5,
                    shape: LfoShape::Sine
                })
                .check()
                .is_err()
        );
        let silent_osc = SourceSpec::Oscillator {
            waveform: Waveform::Sine,
            frequency_hz: 0.0,
        };
        assert!(LayerSpec::new("a", silent_osc, -20.0).check().is_err());
    }
}
