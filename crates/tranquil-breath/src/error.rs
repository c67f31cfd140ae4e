//! Error types for breath programs.

use thiserror::Error;
use tranquil_config::ConfigError;

/// Errors from building, selecting, or persisting breath programs.
#[derive(Debug, Error)]
pub enum BreathError {
    /// A program id that is not in the built-in table
    #[error("unknown breath program '{0}' (expected one of: calm, focus, energy, prana)")]
    UnknownProgram(String),

    /// A program with no phases
    #[error("breath program has no phases")]
    EmptyProgram,

    /// A phase with zero duration
    #[error("phase {index} has zero duration")]
    ZeroDuration {
        /// Position of the offending phase.
        index: usize,
    },

    /// A program made only of gaps
    #[error("breath program needs at least one inhale, hold, or exhale phase")]
    OnlyGaps,

    /// Settings store failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result type for breath operations.
pub type Result<T> = std::result::Result<T, BreathError>;
