//! Helpers shared by commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tranquil_config::{KeyValueStore, TomlStore, keys, paths};
use tranquil_soundscape::SoundscapeSpec;

/// Preset used when neither the command line nor settings name one.
pub const DEFAULT_PRESET: &str = "shoreline";

/// Open the settings store at `path`, or the platform default.
pub fn open_store(path: Option<PathBuf>) -> anyhow::Result<TomlStore> {
    let path = path.unwrap_or_else(paths::settings_path);
    TomlStore::open(&path).with_context(|| format!("opening settings {}", path.display()))
}

/// Resolve the soundscape to use: the explicit name, then the stored one,
/// then the default. An explicit choice is saved for next time.
pub fn select_preset(
    explicit: Option<&str>,
    store: &mut dyn KeyValueStore,
) -> anyhow::Result<SoundscapeSpec> {
    match explicit {
        Some(name) => {
            let spec = SoundscapeSpec::resolve(name)
                .with_context(|| format!("loading soundscape '{name}'"))?;
            store.set(keys::SOUNDSCAPE_PRESET, name)?;
            Ok(spec)
        }
        None => {
            let stored = store.get(keys::SOUNDSCAPE_PRESET);
            let name = stored.as_deref().unwrap_or(DEFAULT_PRESET);
            match SoundscapeSpec::resolve(name) {
                Ok(spec) => Ok(spec),
                Err(err) => {
                    tracing::warn!(preset = name, error = %err, "stored soundscape unusable, using default");
                    Ok(SoundscapeSpec::default())
                }
            }
        }
    }
}

/// Install a Ctrl+C handler and return the flag it clears.
pub fn interrupt_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}
