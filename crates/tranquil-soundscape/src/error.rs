//! Error types for soundscapes.

use thiserror::Error;
use tranquil_config::ConfigError;

/// Errors from loading soundscape descriptions or unlocking audio.
#[derive(Debug, Error)]
pub enum SoundscapeError {
    /// The audio environment refused to unlock
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// A soundscape description failed validation
    #[error("invalid soundscape '{name}': {reason}")]
    InvalidSpec {
        /// Soundscape name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No built-in or user preset with this name
    #[error("soundscape preset not found: {0}")]
    PresetNotFound(String),

    /// A preset file is not valid TOML for a soundscape
    #[error("preset parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Reading a preset file or locating the preset directory failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result type for soundscape operations.
pub type Result<T> = std::result::Result<T, SoundscapeError>;
