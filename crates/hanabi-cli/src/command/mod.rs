use clap::{Parser, Subcommand};

use self::{breed::BreedArg, inspect::InspectArg, seed::SeedArg};

mod breed;
mod inspect;
mod seed;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Write a checkpoint of mutated copies of the seed policy
    Seed(#[clap(flatten)] SeedArg),
    /// Print the policies stored in a checkpoint
    Inspect(#[clap(flatten)] InspectArg),
    /// Cross two policies from a checkpoint and print the mutated child
    Breed(#[clap(flatten)] BreedArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init_logging(&args.log_level)?;
    match args.mode {
        Mode::Seed(arg) => seed::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Breed(arg) => breed::run(&arg)?,
    }
    Ok(())
}
