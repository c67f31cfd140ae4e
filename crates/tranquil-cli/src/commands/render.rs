//! Render a soundscape session offline to a WAV file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tranquil_core::ManualClock;
use tranquil_io::{WavSink, WavSpec};
use tranquil_soundscape::{OfflineEnvironment, SoundscapeManager};

use super::common::{open_store, select_preset};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(short, long, value_name = "FILE")]
    out: PathBuf,

    /// Preset name or TOML path; defaults to the last one used
    #[arg(short, long)]
    preset: Option<String>,

    /// Total length in seconds
    #[arg(short, long, default_value = "30")]
    seconds: f64,

    /// When to switch off; defaults to leaving room for the full fade-out
    #[arg(long)]
    fade_out_at: Option<f64>,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Bit depth: 16, 24, or 32 (float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

const BLOCK_FRAMES: usize = 1024;

pub fn run(args: RenderArgs, settings: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!(args.seconds > 0.0, "--seconds must be > 0");
    anyhow::ensure!(args.sample_rate > 0, "--sample-rate must be > 0");
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "--bit-depth must be 16, 24, or 32"
    );

    let mut store = open_store(settings)?;
    let spec = select_preset(args.preset.as_deref(), &mut store)?;
    let fade_out_at = args
        .fade_out_at
        .unwrap_or_else(|| (args.seconds - f64::from(spec.fade_out_secs)).max(0.0));

    println!("Rendering '{}' to {}", spec.name, args.out.display());

    let clock = ManualClock::new();
    let env = OfflineEnvironment::new(args.sample_rate as f32);
    let mut manager = SoundscapeManager::new(env, clock.clone(), spec);

    let wav_spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    let mut sink = WavSink::create(&args.out, wav_spec)?;

    let total_frames = (args.seconds * f64::from(args.sample_rate)).round() as u64;
    let pb = ProgressBar::new(total_frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut block = vec![0.0f32; BLOCK_FRAMES * 2];
    let mut rendered = 0u64;
    manager.set_enabled(true);

    while rendered < total_frames {
        let position = rendered as f64 / f64::from(args.sample_rate);
        if manager.is_enabled() && position >= fade_out_at {
            manager.set_enabled(false);
        }
        manager.poll();

        let frames = (total_frames - rendered).min(BLOCK_FRAMES as u64) as usize;
        let block = &mut block[..frames * 2];
        manager.environment_mut().render(block);
        sink.write_interleaved(block)?;

        rendered += frames as u64;
        clock.advance(Duration::from_secs_f64(
            frames as f64 / f64::from(args.sample_rate),
        ));
        pb.set_position(rendered);
    }
    pb.finish();

    let state = manager.poll();
    manager.shutdown();
    let frames = sink.finalize()?;

    println!(
        "Wrote {} frames ({:.1}s), session ended {}",
        frames,
        frames as f64 / f64::from(args.sample_rate),
        state
    );
    Ok(())
}
