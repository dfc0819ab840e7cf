//! Belief inference and rule-based decision making for Hanabi players.
//!
//! This crate turns what a player can observe into an action, in three layers:
//!
//! 1. **Belief** ([`belief`]) - Tracks hints about the player's own hand and
//!    derives, from the latest snapshot, how likely each card is to be
//!    playable, soon playable, useless or necessary.
//!
//! 2. **Rules** ([`rule`]) - Small decision primitives (play, discard, hint)
//!    parameterized by a slot or card criterion and, for play and discard, a
//!    probability threshold. A rule either proposes an action or declines.
//!
//! 3. **Policy** ([`policy`]) - An ordered list of rules. The first rule that
//!    fires decides the turn; a fixed fallback covers the case where none does.
//!
//! # Architecture
//!
//! ```text
//! Player (event-driven, one per seat)
//!     ↓ owns
//! Policy (first firing rule wins)
//!     ↓ queries
//! Rule (play / discard / hint)
//!     ↓ reads
//! BeliefEngine (card statistics)
//! ```
//!
//! [`agent::Player`] is the entry point for a game session: it feeds
//! [`GameEvent`](hanabi_engine::GameEvent)s into its belief and asks its policy
//! for an action whenever it is the player's turn.
//!
//! # Evolution
//!
//! Policies are the genome of the genetic algorithm in `hanabi-training`.
//! [`Policy::mutate`](policy::Policy::mutate) perturbs thresholds, swaps
//! criteria, and drops, reorders or inserts rules according to
//! [`MutationParams`](mutation::MutationParams);
//! [`Policy::crossover`](policy::Policy::crossover) splices two parents at a
//! single cut point.
//!
//! # Determinism
//!
//! Nothing in this crate owns a random number generator. Every stochastic
//! operation borrows one from the caller, so a seeded generator reproduces the
//! same decisions and the same offspring.
//!
//! # Example
//!
//! ```
//! use hanabi_engine::{Action, Clue, GameEvent, GameSnapshot, Hint};
//! use hanabi_evaluator::{
//!     agent::Player,
//!     policy::Policy,
//!     rule::{Rule, SlotCriterion},
//! };
//! use rand::SeedableRng as _;
//!
//! let policy = Policy::new("alice", vec![Rule::play(SlotCriterion::LastHinted, 0.9)]);
//! let mut player = Player::new(policy);
//!
//! player
//!     .handle(&GameEvent::StateUpdated(GameSnapshot {
//!         hand_size: 5,
//!         ..GameSnapshot::default()
//!     }))
//!     .unwrap();
//! player
//!     .handle(&GameEvent::HintGiven(Hint {
//!         source: "bob".to_owned(),
//!         destination: "alice".to_owned(),
//!         clue: Clue::Value(1),
//!         positions: vec![0],
//!     }))
//!     .unwrap();
//!
//! let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(0);
//! assert_eq!(player.choose_action(&mut rng).unwrap(), Action::Play { index: 0 });
//! ```

pub mod agent;
pub mod belief;
pub mod mutation;
pub mod policy;
pub mod rule;
