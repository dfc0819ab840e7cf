use std::path::PathBuf;

use anyhow::Context as _;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BreedArg {
    /// Checkpoint file holding both parents
    checkpoint: PathBuf,
    /// Name of the parent contributing the leading rules
    first: String,
    /// Name of the parent contributing the trailing rules
    second: String,
    /// Child name; defaults to the checkpoint's next id
    #[arg(long)]
    name: Option<String>,
    /// Evolution parameters (JSON); missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BreedArg) -> anyhow::Result<()> {
    let BreedArg {
        checkpoint: checkpoint_path,
        first,
        second,
        name,
        config,
        seed,
        output,
    } = arg;
    let checkpoint = util::read_checkpoint_file(checkpoint_path)?;
    let params = util::read_params_file(config.as_deref())?;
    let mut rng = util::make_rng(*seed);

    let find = |name: &str| {
        checkpoint
            .agents
            .iter()
            .find(|agent| agent.name == name)
            .with_context(|| {
                format!(
                    "No agent named {name} in checkpoint: {}",
                    checkpoint_path.display()
                )
            })
    };
    let first = find(first.as_str())?;
    let second = find(second.as_str())?;

    let name = name
        .clone()
        .unwrap_or_else(|| format!("id{}", checkpoint.id));
    let mut child = first.crossover(name, second, &mut rng);
    child.mutate(&params.mutation, &mut rng);
    tracing::info!(first = %first.name, second = %second.name, child = %child.name, "bred child");
    eprintln!("{child}");

    util::save_json(&child, output.as_deref())?;
    Ok(())
}
