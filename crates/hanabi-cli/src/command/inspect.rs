use std::path::PathBuf;

use hanabi_stats::descriptive::DescriptiveStats;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Checkpoint file
    checkpoint: PathBuf,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { checkpoint } = arg;
    let checkpoint = util::read_checkpoint_file(checkpoint)?;

    println!("Next id: {}", checkpoint.id);
    println!("Agents:  {}", checkpoint.agents.len());
    if let Some(stats) =
        DescriptiveStats::new(checkpoint.agents.iter().map(|agent| agent.rules.len() as f64))
    {
        println!(
            "Rules:   min {} / median {:.1} / mean {:.2} / max {}",
            stats.min, stats.median, stats.mean, stats.max
        );
    }
    for agent in &checkpoint.agents {
        println!();
        println!("{agent}");
    }
    Ok(())
}
