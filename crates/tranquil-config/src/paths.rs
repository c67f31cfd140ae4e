//! Platform-specific paths for settings and soundscape presets.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/tranquil/` (Linux), `~/Library/Application Support/tranquil/` (macOS), `%APPDATA%\tranquil\` (Windows)
//! - **Settings file**: `<user config>/settings.toml`
//! - **User soundscapes**: `<user config>/soundscapes/`
//!
//! # Example
//!
//! ```rust,no_run
//! use tranquil_config::paths;
//!
//! println!("Settings: {:?}", paths::settings_path());
//! if let Some(path) = paths::find_soundscape("rainfall") {
//!     println!("Found soundscape at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "tranquil";

/// Subdirectory name for user soundscape presets.
const SOUNDSCAPES_SUBDIR: &str = "soundscapes";

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user soundscape presets directory.
pub fn user_soundscapes_dir() -> PathBuf {
    user_config_dir().join(SOUNDSCAPES_SUBDIR)
}

/// Returns the path of the persisted settings file.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Find a soundscape preset file.
///
/// The name can be a path to an existing TOML file, or a preset name (with
/// or without `.toml`) looked up in [`user_soundscapes_dir`].
pub fn find_soundscape(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    let user_path = user_soundscapes_dir().join(filename);
    user_path.is_file().then_some(user_path)
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), crate::ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| crate::ConfigError::create_dir(dir, e))?;
    }
    Ok(())
}

/// List the TOML files in the user soundscapes directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_soundscapes() -> Vec<PathBuf> {
    list_toml_in_dir(&user_soundscapes_dir())
}

fn list_toml_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    found.sort();
    found
}

/// Get the preset name from a file path (the file stem).
///
/// ```rust
/// use tranquil_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/night_rain.toml"));
/// assert_eq!(name, Some("night_rain".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
