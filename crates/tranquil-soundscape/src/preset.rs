//! Soundscape descriptions and the built-in presets.
//!
//! A [`SoundscapeSpec`] is the complete recipe for one session: its layers,
//! the shared reverb, and the fade timings. Built-ins are available by name;
//! anything else is resolved as a TOML file, either a direct path or a name in
//! the user soundscapes directory.
//!
//! ```toml
//! name = "rainfall"
//! fade_in_secs = 6.0
//! fade_out_secs = 4.0
//!
//! [reverb]
//! decay_secs = 5.0
//! wet = 0.3
//!
//! [[layers]]
//! name = "rain"
//! volume_db = -36.0
//! source = { kind = "noise", color = "white" }
//! modulators = [{ type = "highpass", frequency_hz = 900.0 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tranquil_config::{ConfigError, paths};

use crate::error::{Result, SoundscapeError};
use crate::layer::{
    LayerSpec, LfoShape, MAX_TIMING_SECS, ModulatorSpec, Noise, SourceSpec, Waveform,
};

/// Names of the presets compiled into the crate.
pub const BUILTIN_NAMES: &[&str] = &["shoreline", "drone"];

fn default_damping() -> f32 {
    0.3
}

/// Settings for the session's shared reverb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbSpec {
    /// Time for the tail to decay by 60 dB.
    pub decay_secs: f32,
    /// Wet/dry balance, 0..=1.
    pub wet: f32,
    /// High-frequency damping in the feedback loops, 0..=1.
    #[serde(default = "default_damping")]
    pub damping: f32,
}

/// A complete soundscape recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundscapeSpec {
    /// Preset name.
    pub name: String,
    /// Per-layer fade-in ramp length.
    pub fade_in_secs: f32,
    /// Fade-out ramp length before disposal.
    pub fade_out_secs: f32,
    /// Shared reverb.
    pub reverb: ReverbSpec,
    /// Signal chains, at least one.
    pub layers: Vec<LayerSpec>,
}

impl Default for SoundscapeSpec {
    fn default() -> Self {
        Self::shoreline()
    }
}

impl SoundscapeSpec {
    /// Filtered noise in three layers: a sweeping breeze, a slow swell, and a
    /// narrow wash.
    pub fn shoreline() -> Self {
        Self {
            name: "shoreline".into(),
            fade_in_secs: 10.0,
            fade_out_secs: 8.0,
            reverb: ReverbSpec {
                decay_secs: 12.0,
                wet: 0.4,
                damping: default_damping(),
            },
            layers: vec![
                LayerSpec::new("breeze", SourceSpec::Noise { color: Noise::Pink }, -40.0)
                    .with_modulator(ModulatorSpec::AutoFilter {
                        rate_hz: 0.08,
                        depth: 0.6,
                        base_hz: 200.0,
                        octaves: 2.5,
                        shape: LfoShape::Sine,
                    }),
                LayerSpec::new("swell", SourceSpec::Noise { color: Noise::Brown }, -42.0)
                    .with_modulator(ModulatorSpec::Tremolo {
                        rate_hz: 0.05,
                        depth: 0.7,
                        shape: LfoShape::Sine,
                    })
                    .with_modulator(ModulatorSpec::Lowpass {
                        frequency_hz: 150.0,
                        q: 0.707,
                    })
                    .with_onset_delay(2.0),
                LayerSpec::new("wash", SourceSpec::Noise { color: Noise::Pink }, -42.0)
                    .with_modulator(ModulatorSpec::Bandpass {
                        frequency_hz: 500.0,
                        q: 1.0,
                    })
                    .with_onset_delay(2.0),
            ],
        }
    }

    /// Low sine pad: a root and a fifth through slow tremolo and a lowpass.
    pub fn drone() -> Self {
        let pad = |name: &str, frequency_hz: f32, rate_hz: f32, volume_db: f32| {
            LayerSpec::new(
                name,
                SourceSpec::Oscillator {
                    waveform: Waveform::Sine,
                    frequency_hz,
                },
                volume_db,
            )
            .with_modulator(ModulatorSpec::Tremolo {
                rate_hz,
                depth: 0.5,
                shape: LfoShape::Triangle,
            })
            .with_modulator(ModulatorSpec::Lowpass {
                frequency_hz: 400.0,
                q: 0.707,
            })
        };

        Self {
            name: "drone".into(),
            fade_in_secs: 8.0,
            fade_out_secs: 6.0,
            reverb: ReverbSpec {
                decay_secs: 8.0,
                wet: 0.5,
                damping: 0.5,
            },
            layers: vec![
                pad("root", 110.0, 0.04, -30.0),
                pad("fifth", 164.81, 0.06, -34.0).with_onset_delay(3.0),
                LayerSpec::new("air", SourceSpec::Noise { color: Noise::Pink }, -48.0)
                    .with_modulator(ModulatorSpec::Highpass {
                        frequency_hz: 2000.0,
                        q: 0.707,
                    })
                    .with_onset_delay(5.0),
            ],
        }
    }

    /// Look up a built-in preset.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "shoreline" => Some(Self::shoreline()),
            "drone" => Some(Self::drone()),
            _ => None,
        }
    }

    /// Resolve a name or path: built-ins first, then TOML files.
    pub fn resolve(name: &str) -> Result<Self> {
        if let Some(spec) = Self::builtin(name) {
            return Ok(spec);
        }
        match paths::find_soundscape(name) {
            Some(path) => Self::load(&path),
            None => Err(SoundscapeError::PresetNotFound(name.to_string())),
        }
    }

    /// Load and validate a preset file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let spec = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), name = %spec.name, "loaded soundscape preset");
        Ok(spec)
    }

    /// Parse and validate a preset from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let spec: Self = toml::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SoundscapeError::Config(e.into()))
    }

    /// Check every field a graph build depends on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| SoundscapeError::InvalidSpec {
            name: self.name.clone(),
            reason,
        };

        if self.layers.is_empty() {
            return Err(invalid("no layers".into()));
        }
        if !(0.0..=MAX_TIMING_SECS).contains(&self.fade_in_secs) {
            return Err(invalid(format!("fade_in_secs must be in 0..={MAX_TIMING_SECS}")));
        }
        if !(0.0..=MAX_TIMING_SECS).contains(&self.fade_out_secs) {
            return Err(invalid(format!("fade_out_secs must be in 0..={MAX_TIMING_SECS}")));
        }
        if !(0.0..=1.0).contains(&self.reverb.wet) || !(0.0..=1.0).contains(&self.reverb.damping)
        {
            return Err(invalid("reverb wet and damping must be in 0..=1".into()));
        }
        if !(self.reverb.decay_secs >= 0.0 && self.reverb.decay_secs <= 60.0) {
            return Err(invalid("reverb decay_secs must be in 0..=60".into()));
        }
        for layer in &self.layers {
            layer.check().map_err(invalid)?;
        }
        Ok(())
    }

    /// Fade-in plus the largest onset delay: how long until every layer is at
    /// its target level.
    pub fn fade_in_span_secs(&self) -> f32 {
        let stagger = self
            .layers
            .iter()
            .map(|l| l.onset_delay_secs)
            .fold(0.0_f32, f32::max);
        stagger + self.fade_in_secs
    }
}
