use std::path::PathBuf;

use hanabi_training::Population;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SeedArg {
    /// Number of policies
    #[arg(long, default_value_t = 20)]
    count: usize,
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

pub(crate) fn run(arg: &SeedArg) -> anyhow::Result<()> {
    let SeedArg {
        count,
        config,
        seed,
        output,
    } = arg;
    let params = util::read_params_file(config.as_deref())?;
    let mut rng = util::make_rng(*seed);

    let population = Population::seeded(*count, params, &mut rng);
    tracing::info!(count, "seeded population");
    util::save_json(&population.to_checkpoint(), output.as_deref())?;
    Ok(())
}
