//! Tranquil Breath - breath programs and the breath pacer
//!
//! - [`ProgramId`] / [`BreathProgram`] - The built-in program table and validated phase lists
//! - [`BreathPacer`] - Selected program plus position in its cycle; emits a [`PacerFrame`] per tick
//! - [`frame_at`] - The pure phase and countdown computation behind every frame
//! - [`IntervalDriver`] - Drift-free fixed-interval tick source
//! - [`load_program`] / [`save_program`] - Persisted selection
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tranquil_breath::{BreathPacer, IntervalDriver, ProgramId};
//! use tranquil_core::ManualClock;
//!
//! let clock = ManualClock::new();
//! let mut driver = IntervalDriver::new(clock.clone(), Duration::from_secs(1));
//! let mut pacer = BreathPacer::new("calm".parse::<ProgramId>()?);
//!
//! clock.advance(Duration::from_secs(3));
//! let mut last = None;
//! for _ in 0..driver.due() {
//!     last = Some(pacer.tick(driver.interval()));
//! }
//! assert_eq!(last.and_then(|f| f.display_count), Some(1));
//! # Ok::<(), tranquil_breath::BreathError>(())
//! ```

mod driver;
mod error;
mod pacer;
mod persist;
mod program;

pub use driver::IntervalDriver;
pub use error::{BreathError, Result};
pub use pacer::{BreathPacer, PacerFrame, frame_at};
pub use persist::{load_program, save_program};
pub use program::{BreathProgram, Phase, PhaseLabel, ProgramId};
