//! Configuration for tranquil sessions.
//!
//! # Features
//!
//! - **Settings store**: [`KeyValueStore`] with in-memory and TOML-file backends
//! - **Paths**: Platform-specific config and soundscape preset directories
//! - **Errors**: [`ConfigError`], shared by every crate that touches config files
//!
//! # Example
//!
//! ```rust,no_run
//! use tranquil_config::{KeyValueStore, TomlStore, keys, settings_path};
//!
//! let mut store = TomlStore::open(settings_path())?;
//! let program = store.get(keys::BREATH_PROGRAM).unwrap_or_else(|| "calm".into());
//! store.set(keys::BREATH_PROGRAM, &program)?;
//! # Ok::<(), tranquil_config::ConfigError>(())
//! ```

mod error;
mod store;

/// Platform-specific paths for settings and presets.
pub mod paths;

pub use error::ConfigError;
pub use paths::{
    find_soundscape, list_user_soundscapes, preset_name_from_path, settings_path,
    user_config_dir, user_soundscapes_dir,
};
pub use store::{KeyValueStore, MemoryStore, TomlStore, keys};
