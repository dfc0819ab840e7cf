//! Training system for evolving rule-based Hanabi policies.
//!
//! This crate evolves [`Policy`](hanabi_evaluator::policy::Policy) genomes with
//! a steady-state genetic algorithm. Fitness comes from real games: every
//! evaluation seats policies at a table through a [`GameSession`] and uses
//! the final team score.
//!
//! # How Training Works
//!
//! 1. **Seed** - Start from `n` mutated copies of a hand-written policy
//!    ([`seed::seed_policy`]) or restore a [`Checkpoint`].
//! 2. **Evaluate** - Score every member, a few members per shared game.
//! 3. **Epoch** - Kill one weak member, breed one child from two parents,
//!    and score the child together with a small cohort of existing members.
//! 4. **Checkpoint** - Periodically save the id counter and all policies.
//!
//! # Architecture
//!
//! ```text
//! Population (kill / breed / evaluate)
//!     ↓ spawns one scoped thread per cohort member
//! GameSession (external: joins a live game)
//!     ↓ drives
//! Player (hanabi-evaluator)
//!     ↓ reports
//! Final score → fitness
//! ```
//!
//! Evaluation is the only concurrent step. Each cohort member owns its own
//! [`Player`](hanabi_evaluator::agent::Player) on its own thread, and the
//! population blocks until the whole cohort has finished before it reads any
//! score.
//!
//! # Example
//!
//! ```
//! use hanabi_evaluator::agent::Player;
//! use hanabi_training::{
//!     EvolverParams, GameSession, Population, SessionError,
//! };
//! use rand::SeedableRng as _;
//!
//! /// Scores a policy by its rule count.
//! struct RuleCount;
//!
//! impl GameSession for RuleCount {
//!     fn play(&self, player: Player) -> Result<i32, SessionError> {
//!         Ok(player.policy().rules.len() as i32)
//!     }
//! }
//!
//! let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(0);
//! let mut population =
//!     Population::initialize_seeded(8, EvolverParams::default(), &RuleCount, &mut rng).unwrap();
//! for epoch in 0..5 {
//!     population.run_epoch(epoch, &RuleCount, &mut rng).unwrap();
//! }
//! assert_eq!(population.id_counter(), 13);
//! ```
//!
//! # Current Limitations
//!
//! - **Noisy fitness**: A member's fitness is its last game's score, so one
//!   lucky game can protect a weak policy from being killed.
//! - **No deadline**: A session that never returns stalls the epoch.

pub use self::{
    checkpoint::{Checkpoint, CheckpointError, CheckpointStore, JsonCheckpointDir, read_json},
    population::{EpochReport, EvolutionError, EvolverParams, InvalidParams, Member, Population},
    session::{GameSession, SessionError, evaluate_cohort},
};

pub mod checkpoint;
pub mod population;
pub mod seed;
pub mod session;
