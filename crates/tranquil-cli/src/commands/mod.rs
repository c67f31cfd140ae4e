//! CLI command implementations.

pub mod breathe;
pub mod common;
pub mod presets;
pub mod programs;
pub mod render;
pub mod settings;
pub mod soundscape;
