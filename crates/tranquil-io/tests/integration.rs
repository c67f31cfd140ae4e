//! Offline render of a full soundscape session to WAV.

use tempfile::NamedTempFile;
use tranquil_core::ManualClock;
use tranquil_io::{WavSink, WavSpec, read_wav, read_wav_info};
use tranquil_soundscape::{OfflineEnvironment, SessionState, SoundscapeManager, SoundscapeSpec};

const SAMPLE_RATE: u32 = 8000;
const BLOCK_FRAMES: usize = 400;

/// Render with the clock advanced in step with the audio, like `tranquil render`.
fn render_session(spec: SoundscapeSpec, fade_out_at: f64, total: f64) -> (Vec<f32>, usize) {
    let clock = ManualClock::new();
    let env = OfflineEnvironment::new(SAMPLE_RATE as f32);
    let mut manager = SoundscapeManager::new(env, clock.clone(), spec);
    manager.set_enabled(true);

    let file = NamedTempFile::new().unwrap();
    let mut sink = WavSink::create(
        file.path(),
        WavSpec {
            sample_rate: SAMPLE_RATE,
            ..WavSpec::default()
        },
    )
    .unwrap();

    let block_secs = BLOCK_FRAMES as f64 / f64::from(SAMPLE_RATE);
    let blocks = (total / block_secs).round() as usize;
    let mut block = vec![0.0f32; BLOCK_FRAMES * 2];
    let mut disabled = false;
    for i in 0..blocks {
        if !disabled && i as f64 * block_secs >= fade_out_at {
            manager.set_enabled(false);
            disabled = true;
        }
        manager.poll();
        manager.environment_mut().render(&mut block);
        sink.write_interleaved(&block).unwrap();
        clock.advance_secs(block_secs);
    }
    manager.poll();
    assert_eq!(manager.state(), SessionState::Absent);
    assert_eq!(manager.live_nodes(), 0);

    let frames = sink.finalize().unwrap();
    assert_eq!(frames as usize, blocks * BLOCK_FRAMES);
    let (samples, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(read_wav_info(file.path()).unwrap().num_frames, frames);
    (samples, blocks)
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt()
}

#[test]
fn shoreline_render_fades_in_and_out() {
    let (samples, _) = render_session(SoundscapeSpec::shoreline(), 14.0, 24.0);
    let second = |s: usize| &samples[s * 16000..(s + 1) * 16000];

    let start = rms(second(0));
    let full = rms(second(12));
    let end = rms(second(23));

    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(full > start * 2.0, "fade-in: start {start}, full {full}");
    assert!(full > 0.0 && full < 0.5, "level {full}");
    // Fade-out finished at 22 s; the device is disconnected after that
    assert_eq!(end, 0.0);
}

#[test]
fn drone_render_is_bounded() {
    let (samples, _) = render_session(SoundscapeSpec::drone(), 9.0, 16.0);
    let peak = samples.iter().fold(0.0f32, |a, s| a.max(s.abs()));
    assert!(peak > 0.0);
    assert!(peak < 1.0, "peak {peak}");
}
