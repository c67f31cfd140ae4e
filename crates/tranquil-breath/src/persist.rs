//! Remembering the selected program between sessions.

use tranquil_config::{KeyValueStore, keys};

use crate::{ProgramId, Result};

/// Read the last selected program.
///
/// Called once when a breath session starts. A missing key yields the
/// default program. A stored value that no longer names a program is
/// logged and also yields the default, so a stale settings file cannot
/// keep the session from starting.
pub fn load_program(store: &dyn KeyValueStore) -> ProgramId {
    match store.get(keys::BREATH_PROGRAM) {
        None => ProgramId::default(),
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            tracing::warn!(value = %raw, error = %err, "ignoring stored breath program");
            ProgramId::default()
        }),
    }
}

/// Persist a program selection.
pub fn save_program(store: &mut dyn KeyValueStore, id: ProgramId) -> Result<()> {
    store.set(keys::BREATH_PROGRAM, id.as_str())?;
    Ok(())
}
