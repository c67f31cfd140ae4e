//! Run the breath pacer in the terminal.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Args;
use tranquil_breath::{BreathPacer, IntervalDriver, PacerFrame, ProgramId, load_program, save_program};
use tranquil_core::SystemClock;

use super::common::{interrupt_flag, open_store};

#[derive(Args)]
pub struct BreatheArgs {
    /// Program id (calm, focus, energy, prana); defaults to the last one used
    #[arg(short, long)]
    program: Option<String>,

    /// Number of full cycles to run
    #[arg(short, long, default_value = "1")]
    cycles: u32,

    /// Wall-clock milliseconds per pacer second (lower values fast-forward)
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
}

/// One display line per tick: the phase label and its countdown.
pub fn format_frame(frame: &PacerFrame) -> String {
    match frame.display_count {
        Some(count) => format!("{:<6} {}", frame.label, count),
        None => format!("{:<6} -", frame.label),
    }
}

pub fn run(args: BreatheArgs, settings: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!(args.interval_ms > 0, "--interval-ms must be > 0");

    let mut store = open_store(settings)?;
    let id = match &args.program {
        Some(raw) => raw.parse::<ProgramId>()?,
        None => load_program(&store),
    };
    save_program(&mut store, id)?;

    let mut pacer = BreathPacer::new(id);
    let total = u64::from(pacer.program().cycle_secs()) * u64::from(args.cycles);
    tracing::info!(program = %id, cycles = args.cycles, "breath session started");

    let running = interrupt_flag()?;
    let mut driver = IntervalDriver::new(SystemClock::new(), Duration::from_millis(args.interval_ms));
    let mut shown = 0u64;

    while shown < total && running.load(Ordering::SeqCst) {
        let due = driver.due().min(total - shown);
        for _ in 0..due {
            let frame = pacer.tick(Duration::from_secs(1));
            println!("{}", format_frame(&frame));
            shown += 1;
        }
        if shown < total {
            std::thread::sleep(driver.until_next().min(Duration::from_millis(100)));
        }
    }

    tracing::info!(program = %id, ticks = shown, "breath session ended");
    Ok(())
}
