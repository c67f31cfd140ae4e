//! Persisted string key-value settings.
//!
//! Sessions read their last selection once at start and write on every
//! change. Values are opaque strings; parsing them is the reader's job.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Well-known settings keys.
pub mod keys {
    /// Last selected breath program id.
    pub const BREATH_PROGRAM: &str = "breath.program";
    /// Last selected soundscape preset name.
    pub const SOUNDSCAPE_PRESET: &str = "soundscape.preset";
}

/// String key-value storage.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, persisting it before returning.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat TOML table of strings.
///
/// Every [`set`](KeyValueStore::set) rewrites the whole file through a
/// sibling temp file and a rename, so a crash mid-write leaves the old
/// contents intact.
///
/// ```rust,no_run
/// use tranquil_config::{KeyValueStore, TomlStore, keys, settings_path};
///
/// let mut store = TomlStore::open(settings_path())?;
/// store.set(keys::BREATH_PROGRAM, "calm")?;
/// # Ok::<(), tranquil_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
            parse_table(&content)?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "settings opened");
        Ok(Self { path, values })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            crate::paths::ensure_dir(parent)?;
        }

        let content = toml::to_string(values)?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).map_err(|e| ConfigError::write_file(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ConfigError::write_file(&self.path, e))
    }
}

impl KeyValueStore for TomlStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if self.values.get(key).is_some_and(|v| v == value) {
            return Ok(());
        }
        // Memory only changes once the file does
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)?;
        self.values = values;
        tracing::debug!(key, value, "setting saved");
        Ok(())
    }
}

fn parse_table(content: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let table: toml::Table = toml::from_str(content)?;
    table
        .into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(s) => Ok((key, s)),
            _ => Err(ConfigError::NonStringValue { key }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(keys::BREATH_PROGRAM), None);
        store.set(keys::BREATH_PROGRAM, "prana").unwrap();
        assert_eq!(store.get(keys::BREATH_PROGRAM).as_deref(), Some("prana"));
    }

    #[test]
    fn toml_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TomlStore::open(dir.path().join("settings.toml")).unwrap();
        assert_eq!(store.entries().count(), 0);
        assert!(!store.path().exists(), "open must not create the file");
    }

    #[test]
    fn toml_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = TomlStore::open(&path).unwrap();
        store.set(keys::BREATH_PROGRAM, "focus").unwrap();
        store.set(keys::SOUNDSCAPE_PRESET, "shoreline").unwrap();

        let reopened = TomlStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::BREATH_PROGRAM).as_deref(), Some("focus"));
        assert_eq!(
            reopened.get(keys::SOUNDSCAPE_PRESET).as_deref(),
            Some("shoreline")
        );
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn toml_store_failed_write_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("settings.toml");

        let mut store = TomlStore::open(&path).unwrap();
        let err = store.set(keys::BREATH_PROGRAM, "prana").unwrap_err();
        assert!(matches!(err, ConfigError::WriteFile { .. }), "{err}");
        assert_eq!(store.get(keys::BREATH_PROGRAM), None);

        // A later successful write does not carry the failed value
        std::fs::remove_file(&blocker).unwrap();
        store.set(keys::SOUNDSCAPE_PRESET, "drone").unwrap();
        let reopened = TomlStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::BREATH_PROGRAM), None);
        assert_eq!(reopened.get(keys::SOUNDSCAPE_PRESET).as_deref(), Some("drone"));
    }

    #[test]
    fn toml_store_rejects_non_string_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "\"breath.program\" = 3\n").unwrap();

        let err = TomlStore::open(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NonStringValue { ref key } if key == "breath.program"));
    }

    #[test]
    fn toml_store_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not toml at all [").unwrap();

        assert!(matches!(
            TomlStore::open(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
