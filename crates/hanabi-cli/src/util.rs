use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use hanabi_training::{Checkpoint, EvolverParams, JsonCheckpointDir};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

/// Writes pretty JSON to `output`, or to stdout when no path is given.
pub fn save_json<T>(value: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads evolution parameters, falling back to the defaults without a file.
pub fn read_params_file(path: Option<&Path>) -> anyhow::Result<EvolverParams> {
    let Some(path) = path else {
        return Ok(EvolverParams::default());
    };
    let params: EvolverParams = hanabi_training::read_json(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;
    params
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(params)
}

pub fn read_checkpoint_file(path: &Path) -> anyhow::Result<Checkpoint> {
    JsonCheckpointDir::load(path)
        .with_context(|| format!("Failed to load checkpoint: {}", path.display()))
}

/// A seeded generator when `seed` is given, otherwise one seeded from the OS.
pub fn make_rng(seed: Option<u64>) -> Pcg64Mcg {
    match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    }
}
