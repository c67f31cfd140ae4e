//! The breath pacer: a program plus a position in its cycle.
//!
//! Everything the display shows is computed from `(program, elapsed)` by
//! [`frame_at`]. Ticking only moves `elapsed`; selecting a program only
//! resets it. There is no per-phase timer to cancel.

use std::time::Duration;

use crate::program::{BreathProgram, PhaseLabel, ProgramId, wrap};

/// What the display adapter renders for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerFrame {
    /// Current phase label.
    pub label: PhaseLabel,
    /// Index of the current phase in the program.
    pub phase_index: usize,
    /// Whole seconds left in the phase, in `1..=duration`. `None` during a
    /// gap, or when no time is left in the phase.
    pub display_count: Option<u32>,
    /// Offset into the cycle this frame was computed at.
    pub elapsed: Duration,
}

/// Compute the frame for `elapsed` seconds into `program`'s cycle.
///
/// For a non-gap phase of duration `D` starting at `S`, the count is
/// `D - (elapsed - S)` rounded up, clamped to `1..=D`.
///
/// ```rust
/// use std::time::Duration;
/// use tranquil_breath::{PhaseLabel, ProgramId, frame_at};
///
/// let calm = ProgramId::Calm.program();
/// let frame = frame_at(&calm, Duration::from_secs(4));
/// assert_eq!(frame.label, PhaseLabel::Exhale);
/// assert_eq!(frame.display_count, Some(4));
/// ```
pub fn frame_at(program: &BreathProgram, elapsed: Duration) -> PacerFrame {
    let elapsed = wrap(elapsed, program.cycle());
    let (phase_index, start) = program.locate(elapsed);
    let phase = program.phases()[phase_index];

    let display_count = match phase.label {
        PhaseLabel::Gap => None,
        _ => {
            let duration = Duration::from_secs(u64::from(phase.duration_secs));
            let remaining = duration.saturating_sub(elapsed - start);
            if remaining.is_zero() {
                None
            } else {
                let secs = remaining.as_nanos().div_ceil(1_000_000_000) as u32;
                Some(secs.clamp(1, phase.duration_secs))
            }
        }
    };

    PacerFrame {
        label: phase.label,
        phase_index,
        display_count,
        elapsed,
    }
}

/// A running breath session.
///
/// The first [`tick`](Self::tick) after construction or after
/// [`select_program`](Self::select_program) reports the start of the cycle
/// without advancing; every later tick advances by its delta.
///
/// ```rust
/// use std::time::Duration;
/// use tranquil_breath::{BreathPacer, PhaseLabel, ProgramId};
///
/// let mut pacer = BreathPacer::new(ProgramId::Calm);
/// let second = Duration::from_secs(1);
///
/// assert_eq!(pacer.tick(second).display_count, Some(4)); // t = 0
/// assert_eq!(pacer.tick(second).display_count, Some(3)); // t = 1
///
/// pacer.select_program(ProgramId::Prana);
/// let frame = pacer.tick(second);
/// assert_eq!(frame.label, PhaseLabel::Inhale);
/// assert_eq!(frame.display_count, Some(5));
/// ```
#[derive(Debug, Clone)]
pub struct BreathPacer {
    id: ProgramId,
    program: BreathProgram,
    elapsed: Duration,
    primed: bool,
}

impl BreathPacer {
    /// Start a session on `id`, positioned at the start of the cycle.
    pub fn new(id: ProgramId) -> Self {
        Self {
            id,
            program: id.program(),
            elapsed: Duration::ZERO,
            primed: false,
        }
    }

    /// Replace the program and restart at its first phase.
    ///
    /// Resets even when `id` is the current program.
    pub fn select_program(&mut self, id: ProgramId) {
        tracing::debug!(from = %self.id, to = %id, "breath program selected");
        self.id = id;
        self.program = id.program();
        self.elapsed = Duration::ZERO;
        self.primed = false;
    }

    /// Advance by `delta` (wrapping at the cycle length) and return the new frame.
    pub fn tick(&mut self, delta: Duration) -> PacerFrame {
        if self.primed {
            self.elapsed = wrap(self.elapsed + delta, self.program.cycle());
        } else {
            self.primed = true;
        }

        let frame = self.frame();
        tracing::trace!(
            program = %self.id,
            elapsed_ms = frame.elapsed.as_millis() as u64,
            phase = %frame.label,
            count = ?frame.display_count,
            "breath tick"
        );
        frame
    }

    /// The frame at the current position, without ticking.
    pub fn frame(&self) -> PacerFrame {
        frame_at(&self.program, self.elapsed)
    }

    /// Selected program id.
    pub fn program_id(&self) -> ProgramId {
        self.id
    }

    /// Selected program.
    pub fn program(&self) -> &BreathProgram {
        &self.program
    }

    /// Offset into the current cycle.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for BreathPacer {
    fn default() -> Self {
        Self::new(ProgramId::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    fn at(id: ProgramId, secs: u64) -> PacerFrame {
        frame_at(&id.program(), Duration::from_secs(secs))
    }

    #[test]
    fn calm_countdown() {
        let expect = [
            (0, PhaseLabel::Inhale, 4),
            (3, PhaseLabel::Inhale, 1),
            (4, PhaseLabel::Exhale, 4),
            (7, PhaseLabel::Exhale, 1),
            (8, PhaseLabel::Inhale, 4),
        ];
        for (t, label, count) in expect {
            let frame = at(ProgramId::Calm, t);
            assert_eq!(frame.label, label, "label at t={t}");
            assert_eq!(frame.display_count, Some(count), "count at t={t}");
        }
    }

    #[test]
    fn prana_gaps_have_no_count() {
        let gap = at(ProgramId::Prana, 5);
        assert_eq!(gap.label, PhaseLabel::Gap);
        assert_eq!(gap.display_count, None);

        let hold = at(ProgramId::Prana, 6);
        assert_eq!(hold.label, PhaseLabel::Hold);
        assert_eq!(hold.display_count, Some(15));

        assert_eq!(at(ProgramId::Prana, 21).display_count, None);
        assert_eq!(at(ProgramId::Prana, 22).display_count, Some(10));
        assert_eq!(at(ProgramId::Prana, 32).display_count, None);
    }

    #[test]
    fn fractional_offsets_round_up() {
        let calm = ProgramId::Calm.program();
        let frame = frame_at(&calm, Duration::from_millis(3_500));
        assert_eq!(frame.display_count, Some(1));
        let frame = frame_at(&calm, Duration::from_millis(200));
        assert_eq!(frame.display_count, Some(4));
    }

    #[test]
    fn ticking_a_full_cycle_returns_to_start() {
        let mut pacer = BreathPacer::new(ProgramId::Calm);
        let first = pacer.tick(SECOND);
        for _ in 0..8 {
            pacer.tick(SECOND);
        }
        assert_eq!(pacer.frame(), first);
    }

    #[test]
    fn select_program_restarts_on_next_tick() {
        let mut pacer = BreathPacer::new(ProgramId::Prana);
        for _ in 0..13 {
            pacer.tick(SECOND);
        }
        assert_eq!(pacer.elapsed(), Duration::from_secs(12));

        pacer.select_program(ProgramId::Focus);
        assert_eq!(pacer.elapsed(), Duration::ZERO);

        let frame = pacer.tick(SECOND);
        assert_eq!(frame.phase_index, 0);
        assert_eq!(frame.display_count, Some(3));
        assert_eq!(pacer.program_id(), ProgramId::Focus);
    }

    #[test]
    fn reselecting_same_program_still_resets() {
        let mut pacer = BreathPacer::new(ProgramId::Calm);
        for _ in 0..3 {
            pacer.tick(SECOND);
        }
        pacer.select_program(ProgramId::Calm);
        assert_eq!(pacer.tick(SECOND).display_count, Some(4));
    }

    #[test]
    fn large_delta_wraps() {
        let mut pacer = BreathPacer::new(ProgramId::Calm);
        pacer.tick(SECOND);
        let frame = pacer.tick(Duration::from_secs(8 * 1000 + 5));
        assert_eq!(frame.elapsed, Duration::from_secs(5));
        assert_eq!(frame.label, PhaseLabel::Exhale);
        assert_eq!(frame.display_count, Some(3));
    }
}
