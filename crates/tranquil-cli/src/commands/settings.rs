//! Inspect and change persisted settings.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tranquil_breath::{ProgramId, save_program};
use tranquil_config::{KeyValueStore, keys};
use tranquil_soundscape::SoundscapeSpec;

use super::common::open_store;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print a value, or every value when no key is given
    Get {
        /// Setting key, e.g. breath.program
        key: Option<String>,
    },

    /// Change a value
    Set {
        /// Setting key: breath.program or soundscape.preset
        key: String,
        /// New value
        value: String,
    },

    /// Print the settings file location
    Path,
}

pub fn run(args: SettingsArgs, settings: Option<PathBuf>) -> anyhow::Result<()> {
    let mut store = open_store(settings)?;

    match args.command {
        SettingsCommand::Get { key: Some(key) } => match store.get(&key) {
            Some(value) => println!("{value}"),
            None => println!("(unset)"),
        },
        SettingsCommand::Get { key: None } => {
            for (key, value) in store.entries() {
                println!("{key} = {value}");
            }
        }
        SettingsCommand::Set { key, value } => {
            match key.as_str() {
                keys::BREATH_PROGRAM => save_program(&mut store, value.parse::<ProgramId>()?)?,
                keys::SOUNDSCAPE_PRESET => {
                    SoundscapeSpec::resolve(&value)?;
                    store.set(keys::SOUNDSCAPE_PRESET, &value)?;
                }
                other => anyhow::bail!(
                    "unknown setting '{other}' (expected {} or {})",
                    keys::BREATH_PROGRAM,
                    keys::SOUNDSCAPE_PRESET
                ),
            }
            println!("{key} = {}", store.get(&key).unwrap_or_default());
        }
        SettingsCommand::Path => println!("{}", store.path().display()),
    }
    Ok(())
}
