//! List the breath programs.

use clap::Args;
use tranquil_breath::ProgramId;

#[derive(Args)]
pub struct ProgramsArgs {}

pub fn run(_args: ProgramsArgs) -> anyhow::Result<()> {
    println!("Breath Programs");
    println!("===============\n");

    for id in ProgramId::ALL {
        let program = id.program();
        let phases: Vec<String> = program
            .phases()
            .iter()
            .map(|p| format!("{} {}", p.label, p.duration_secs))
            .collect();
        println!(
            "  {:<8} {:>3}s  {}",
            id.as_str(),
            program.cycle_secs(),
            phases.join(", ")
        );
    }
    Ok(())
}
