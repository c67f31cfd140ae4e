//! Breath programs: ordered phases with whole-second durations.
//!
//! A program's phases tile its cycle end to end. The phase in effect at any
//! offset is found by scanning cumulative boundaries, so nothing about the
//! current phase needs to be remembered between ticks.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{BreathError, Result};

/// What the breather is asked to do during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseLabel {
    /// Breathe in.
    Inhale,
    /// Hold the breath.
    Hold,
    /// Breathe out.
    Exhale,
    /// Unnamed transition with no countdown.
    Gap,
}

impl PhaseLabel {
    /// Lowercase display name.
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseLabel::Inhale => "inhale",
            PhaseLabel::Hold => "hold",
            PhaseLabel::Exhale => "exhale",
            PhaseLabel::Gap => "gap",
        }
    }
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One segment of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    /// What to do.
    pub label: PhaseLabel,
    /// Whole seconds, always > 0 in a valid program.
    pub duration_secs: u32,
}

impl Phase {
    /// Shorthand constructor.
    pub const fn new(label: PhaseLabel, duration_secs: u32) -> Self {
        Self {
            label,
            duration_secs,
        }
    }
}

/// A validated, immutable sequence of phases.
///
/// ```rust
/// use tranquil_breath::{BreathProgram, Phase, PhaseLabel};
///
/// let box_breath = BreathProgram::new(vec![
///     Phase::new(PhaseLabel::Inhale, 4),
///     Phase::new(PhaseLabel::Hold, 4),
///     Phase::new(PhaseLabel::Exhale, 4),
///     Phase::new(PhaseLabel::Hold, 4),
/// ])?;
/// assert_eq!(box_breath.cycle_secs(), 16);
/// # Ok::<(), tranquil_breath::BreathError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathProgram {
    phases: Vec<Phase>,
    cycle_secs: u32,
}

impl BreathProgram {
    /// Validate and build a program.
    pub fn new(phases: Vec<Phase>) -> Result<Self> {
        if phases.is_empty() {
            return Err(BreathError::EmptyProgram);
        }
        if let Some(index) = phases.iter().position(|p| p.duration_secs == 0) {
            return Err(BreathError::ZeroDuration { index });
        }
        if phases.iter().all(|p| p.label == PhaseLabel::Gap) {
            return Err(BreathError::OnlyGaps);
        }

        let cycle_secs = phases.iter().map(|p| p.duration_secs).sum();
        Ok(Self { phases, cycle_secs })
    }

    /// Phases in order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all phase durations.
    pub fn cycle_secs(&self) -> u32 {
        self.cycle_secs
    }

    /// Cycle length as a [`Duration`].
    pub fn cycle(&self) -> Duration {
        Duration::from_secs(u64::from(self.cycle_secs))
    }

    /// Locate the phase containing `offset` (taken modulo the cycle).
    ///
    /// Returns the phase index and the phase's start offset.
    pub fn locate(&self, offset: Duration) -> (usize, Duration) {
        let offset = wrap(offset, self.cycle());
        let mut start = Duration::ZERO;
        for (index, phase) in self.phases.iter().enumerate() {
            let end = start + Duration::from_secs(u64::from(phase.duration_secs));
            if offset < end {
                return (index, start);
            }
            start = end;
        }
        // offset < cycle, so the scan always returns above
        (self.phases.len() - 1, start)
    }
}

/// `value mod cycle` for durations.
pub(crate) fn wrap(value: Duration, cycle: Duration) -> Duration {
    let cycle_nanos = cycle.as_nanos();
    if cycle_nanos == 0 {
        return Duration::ZERO;
    }
    let rem = value.as_nanos() % cycle_nanos;
    // rem < cycle, and cycles are at most u32::MAX seconds
    Duration::from_nanos(rem as u64)
}

/// The built-in programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgramId {
    /// Inhale 4, exhale 4.
    #[default]
    Calm,
    /// Inhale 3, exhale 3.
    Focus,
    /// Inhale 2, exhale 2.
    Energy,
    /// Inhale 5, hold 15, exhale 10, each followed by a 1 second gap.
    Prana,
}

impl ProgramId {
    /// Every built-in program, in menu order.
    pub const ALL: [ProgramId; 4] = [
        ProgramId::Calm,
        ProgramId::Focus,
        ProgramId::Energy,
        ProgramId::Prana,
    ];

    /// Stable string id, as persisted in settings.
    pub fn as_str(self) -> &'static str {
        match self {
            ProgramId::Calm => "calm",
            ProgramId::Focus => "focus",
            ProgramId::Energy => "energy",
            ProgramId::Prana => "prana",
        }
    }

    /// The program's phase table.
    pub fn program(self) -> BreathProgram {
        use PhaseLabel::{Exhale, Gap, Hold, Inhale};

        let phases = match self {
            ProgramId::Calm => vec![Phase::new(Inhale, 4), Phase::new(Exhale, 4)],
            ProgramId::Focus => vec![Phase::new(Inhale, 3), Phase::new(Exhale, 3)],
            ProgramId::Energy => vec![Phase::new(Inhale, 2), Phase::new(Exhale, 2)],
            ProgramId::Prana => vec![
                Phase::new(Inhale, 5),
                Phase::new(Gap, 1),
                Phase::new(Hold, 15),
                Phase::new(Gap, 1),
                Phase::new(Exhale, 10),
                Phase::new(Gap, 1),
            ],
        };
        let cycle_secs = phases.iter().map(|p| p.duration_secs).sum();
        BreathProgram { phases, cycle_secs }
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProgramId {
    type Err = BreathError;

    fn from_str(s: &str) -> Result<Self> {
        ProgramId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BreathError::UnknownProgram(s.to_string()))
    }
}
