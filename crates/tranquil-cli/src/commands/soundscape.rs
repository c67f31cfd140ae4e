//! Play a soundscape on the output device.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use clap::Args;
use tranquil_core::SystemClock;
use tranquil_io::{BackendStreamConfig, DeviceEnvironment};
use tranquil_soundscape::{SessionState, SoundscapeManager};

use super::common::{interrupt_flag, open_store, select_preset};

#[derive(Args)]
pub struct SoundscapeArgs {
    /// Preset name or TOML path; defaults to the last one used
    #[arg(short, long)]
    preset: Option<String>,

    /// Seconds to keep playing before fading out (until Ctrl+C if omitted)
    #[arg(short, long)]
    seconds: Option<f64>,

    /// Output device (partial name match)
    #[arg(short, long)]
    device: Option<String>,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Buffer size in frames
    #[arg(long, default_value = "512")]
    buffer_size: u32,
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run(args: SoundscapeArgs, settings: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(seconds) = args.seconds {
        anyhow::ensure!(seconds.is_finite() && seconds > 0.0, "--seconds must be > 0");
    }

    let mut store = open_store(settings)?;
    let spec = select_preset(args.preset.as_deref(), &mut store)?;
    let fade_out = spec.fade_out_secs;

    let env = DeviceEnvironment::with_default_backend(BackendStreamConfig {
        sample_rate: args.sample_rate,
        buffer_size: args.buffer_size,
        channels: 2,
        device_name: args.device,
    });
    let mut manager = SoundscapeManager::new(env, SystemClock::new(), spec);

    let running = interrupt_flag()?;
    let started = Instant::now();
    let limit = args.seconds.map(Duration::from_secs_f64);

    println!(
        "Playing '{}'... Press Ctrl+C to fade out.",
        manager.spec().name
    );
    manager.set_enabled(true);
    let mut last = manager.state();

    loop {
        let state = manager.poll();
        if state != last {
            println!("  {state}");
            last = state;
        }

        if state == SessionState::Absent {
            if let Some(err) = manager.last_error() {
                anyhow::bail!("{err}");
            }
            if !manager.is_enabled() {
                break;
            }
        }

        let time_up = limit.is_some_and(|limit| started.elapsed() >= limit);
        if manager.is_enabled() && (time_up || !running.load(Ordering::SeqCst)) {
            println!("Fading out over {fade_out:.0}s...");
            manager.set_enabled(false);
        }

        std::thread::sleep(POLL_INTERVAL);
    }

    println!("Done.");
    Ok(())
}
