//! WAV output for offline renders.
//!
//! Renders are produced block by block, so [`WavSink`] writes interleaved
//! blocks as they arrive instead of collecting the whole session in memory.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::Result;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth: 32 writes floats, anything else integers.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// WAV metadata read from the header alone.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// File format.
    pub spec: WavSpec,
    /// Samples per channel.
    pub num_frames: u64,
    /// Length in seconds.
    pub duration_secs: f64,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));
    Ok(WavInfo {
        spec,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
    })
}

/// Read a WAV file as interleaved f32 samples.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let samples = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok((samples, spec))
}

/// Streaming WAV writer for interleaved blocks.
///
/// ```rust,no_run
/// use tranquil_io::{WavSink, WavSpec};
///
/// let mut sink = WavSink::create("shoreline.wav", WavSpec::default())?;
/// sink.write_interleaved(&[0.0; 1024])?;
/// let frames = sink.finalize()?;
/// # Ok::<(), tranquil_io::Error>(())
/// ```
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    spec: WavSpec,
    samples: u64,
}

impl WavSink {
    /// Create (or truncate) `path`.
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self> {
        let writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
        Ok(Self {
            writer,
            spec,
            samples: 0,
        })
    }

    /// The file format.
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// Append interleaved samples.
    pub fn write_interleaved(&mut self, block: &[f32]) -> Result<()> {
        if self.spec.bits_per_sample == 32 {
            for &sample in block {
                self.writer.write_sample(sample)?;
            }
        } else {
            let max_val = (1i32 << (self.spec.bits_per_sample - 1)) as f32;
            for &sample in block {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                self.writer.write_sample(int_sample)?;
            }
        }
        self.samples += block.len() as u64;
        Ok(())
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.samples / u64::from(self.spec.channels.max(1))
    }

    /// Write the header and close the file. Returns the frame count.
    pub fn finalize(self) -> Result<u64> {
        let frames = self.frames_written();
        self.writer.finalize()?;
        Ok(frames)
    }
}

impl std::fmt::Debug for WavSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSink")
            .field("spec", &self.spec)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}
