//! List soundscape presets.

use clap::Args;
use tranquil_config::paths;
use tranquil_soundscape::{BUILTIN_NAMES, SoundscapeSpec};

#[derive(Args)]
pub struct PresetsArgs {
    /// Print one preset as TOML instead of listing
    #[arg(long, value_name = "NAME")]
    show: Option<String>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    if let Some(name) = args.show {
        let spec = SoundscapeSpec::resolve(&name)?;
        print!("{}", spec.to_toml()?);
        return Ok(());
    }

    println!("Built-in Soundscapes");
    println!("====================\n");
    for name in BUILTIN_NAMES {
        if let Some(spec) = SoundscapeSpec::builtin(name) {
            print_summary(&spec);
        }
    }

    let user = paths::list_user_soundscapes();
    if !user.is_empty() {
        println!("\nUser Soundscapes ({})", paths::user_soundscapes_dir().display());
        for path in user {
            match SoundscapeSpec::load(&path) {
                Ok(spec) => print_summary(&spec),
                Err(err) => println!("  {:<12} (invalid: {err})", path.display()),
            }
        }
    }
    Ok(())
}

fn print_summary(spec: &SoundscapeSpec) {
    let layers: Vec<&str> = spec.layers.iter().map(|l| l.name.as_str()).collect();
    println!(
        "  {:<12} fade {:.0}s in / {:.0}s out  layers: {}",
        spec.name,
        spec.fade_in_secs,
        spec.fade_out_secs,
        layers.join(", ")
    );
}
