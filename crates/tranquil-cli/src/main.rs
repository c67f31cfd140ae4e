//! Tranquil CLI - breath pacing and ambient soundscapes from the terminal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tranquil")]
#[command(author, version, about = "Breath pacer and ambient soundscapes", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List breath programs
    Programs(commands::programs::ProgramsArgs),

    /// Run the breath pacer
    Breathe(commands::breathe::BreatheArgs),

    /// Play a soundscape on the output device
    Soundscape(commands::soundscape::SoundscapeArgs),

    /// Render a soundscape session to a WAV file
    Render(commands::render::RenderArgs),

    /// List soundscape presets
    Presets(commands::presets::PresetsArgs),

    /// Inspect or change persisted settings
    Settings(commands::settings::SettingsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Commands::Programs(args) => commands::programs::run(args),
        Commands::Breathe(args) => commands::breathe::run(args, settings),
        Commands::Soundscape(args) => commands::soundscape::run(args, settings),
        Commands::Render(args) => commands::render::run(args, settings),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Settings(args) => commands::settings::run(args, settings),
    }
}
