//! Steady-state genetic algorithm over rule-based policies.
//!
//! Unlike a generational GA, the population changes by one member per epoch:
//!
//! 1. **Kill** - One member strictly below the median fitness is removed at
//!    random. Members at or above the median always survive.
//! 2. **Breed** - Two parents are drawn independently, each from the upper
//!    half with probability [`EvolverParams::strong_parent_prob`] and from the
//!    lower half otherwise. Their one-point crossover is mutated and named
//!    `id<n>` from a counter that never goes back.
//! 3. **Evaluate** - A cohort of up to [`EvolverParams::cohort_size`] existing
//!    members plays one game together with the child. The child joins the
//!    population with its observed score and each cohort member's fitness is
//!    replaced by its own observed score.
//! 4. **Checkpoint** - Every [`EvolverParams::checkpoint_every`] epochs the
//!    population is written to a [`CheckpointStore`].
//!
//! Fitness is always the most recent game result. It is never averaged with
//! earlier measurements, so it is noisy and favors recent luck.
//!
//! # Median Split
//!
//! The median averages the two middle values for an even-sized population.
//! When every member has the same fitness the lower half is empty: no member
//! is killed, and parent draws fall back to the upper half.

use rand::{
    Rng,
    seq::{IndexedRandom, index},
};
use serde::{Deserialize, Serialize};

use hanabi_evaluator::{
    mutation::{InvalidMutationParam, MutationParams},
    policy::Policy,
};
use hanabi_stats::descriptive::{self, DescriptiveStats};

use crate::{
    checkpoint::{Checkpoint, CheckpointError, CheckpointStore},
    seed::seed_policy,
    session::{GameSession, SessionError, evaluate_cohort},
};

/// Evolution parameters; missing fields take their defaults when loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolverParams {
    /// Probability that a parent is drawn from the upper half.
    pub strong_parent_prob: f64,
    /// Existing members evaluated alongside each child.
    pub cohort_size: usize,
    /// Members per shared game during a full re-evaluation.
    pub batch_size: usize,
    /// Epoch interval between checkpoints; 0 disables checkpoints.
    pub checkpoint_every: usize,
    pub mutation: MutationParams,
}

impl Default for EvolverParams {
    fn default() -> Self {
        Self {
            strong_parent_prob: 0.8,
            cohort_size: 3,
            batch_size: 4,
            checkpoint_every: 10,
            mutation: MutationParams::default(),
        }
    }
}

impl EvolverParams {
    /// Checks every probability, including the nested mutation parameters.
    pub fn validate(&self) -> Result<(), InvalidParams> {
        if !(0.0..=1.0).contains(&self.strong_parent_prob) {
            return Err(InvalidParams::StrongParentProb {
                value: self.strong_parent_prob,
            });
        }
        self.mutation
            .validate()
            .map_err(|source| InvalidParams::Mutation { source })
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidParams {
    #[display("`strong_parent_prob` must be in [0, 1], got {value}")]
    StrongParentProb { value: f64 },
    #[display("invalid mutation parameters")]
    Mutation { source: InvalidMutationParam },
}

/// Clamps to `[0, 1]`, mapping NaN to 0.
fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("game session failed")]
    Session { source: SessionError },
    #[display("game session for {player} panicked")]
    SessionPanicked { player: String },
    #[display("population is empty")]
    EmptyPopulation,
    #[display("failed to save checkpoint for epoch {epoch}")]
    Checkpoint {
        epoch: usize,
        source: CheckpointError,
    },
}

/// A policy and its most recently observed score.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub policy: Policy,
    pub fitness: i32,
}

/// What happened during one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Name of the removed member, if any was below the median.
    pub killed: Option<String>,
    pub child: String,
    /// The child's observed score.
    pub score: i32,
    /// Names of the existing members that played with the child.
    pub cohort: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Member>,
    id_counter: u64,
    params: EvolverParams,
}

impl Population {
    /// Creates a population with every fitness set to 0.
    #[must_use]
    pub fn new(policies: Vec<Policy>, id_counter: u64, params: EvolverParams) -> Self {
        let members = policies
            .into_iter()
            .map(|policy| Member { policy, fitness: 0 })
            .collect();
        Self {
            members,
            id_counter,
            params,
        }
    }

    /// `n` independently mutated copies of the seed policy, named `id0` to
    /// `id<n-1>`, not yet evaluated.
    pub fn seeded<R>(n: usize, params: EvolverParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let policies = (0..n)
            .map(|id| {
                let mut policy = seed_policy(format!("id{id}"));
                policy.mutate(&params.mutation, rng);
                policy
            })
            .collect();
        Self::new(policies, n as u64, params)
    }

    /// [`Population::seeded`] followed by [`Population::reevaluate_all`].
    pub fn initialize_seeded<S, R>(
        n: usize,
        params: EvolverParams,
        session: &S,
        rng: &mut R,
    ) -> Result<Self, EvolutionError>
    where
        S: GameSession + ?Sized,
        R: Rng + ?Sized,
    {
        let mut population = Self::seeded(n, params, rng);
        population.reevaluate_all(session)?;
        Ok(population)
    }

    /// Restores policies and the id counter; every fitness starts at 0.
    #[must_use]
    pub fn from_checkpoint(checkpoint: Checkpoint, params: EvolverParams) -> Self {
        Self::new(checkpoint.agents, checkpoint.id, params)
    }

    /// [`Population::from_checkpoint`] followed by [`Population::reevaluate_all`].
    pub fn resume<S>(
        checkpoint: Checkpoint,
        params: EvolverParams,
        session: &S,
    ) -> Result<Self, EvolutionError>
    where
        S: GameSession + ?Sized,
    {
        let mut population = Self::from_checkpoint(checkpoint, params);
        population.reevaluate_all(session)?;
        Ok(population)
    }

    #[must_use]
    pub fn to_checkpoint(&self) -> Checkpoint {
        Checkpoint {
            id: self.id_counter,
            agents: self
                .members
                .iter()
                .map(|member| member.policy.clone())
                .collect(),
        }
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The id the next child will be named after.
    #[must_use]
    pub fn id_counter(&self) -> u64 {
        self.id_counter
    }

    #[must_use]
    pub fn median_fitness(&self) -> Option<f64> {
        descriptive::median(&self.fitness_values())
    }

    /// Indices of members below the median and of members at or above it.
    #[must_use]
    pub fn split(&self) -> (Vec<usize>, Vec<usize>) {
        let Some(median) = self.median_fitness() else {
            return (vec![], vec![]);
        };
        (0..self.members.len()).partition(|&i| f64::from(self.members[i].fitness) < median)
    }

    /// Removes a random member below the median fitness.
    ///
    /// Returns `None`, removing nobody, when no member is below the median.
    pub fn kill_random_agent<R>(&mut self, rng: &mut R) -> Option<Member>
    where
        R: Rng + ?Sized,
    {
        self.remove_below_median(rng).map(|(_, member)| member)
    }

    fn remove_below_median<R>(&mut self, rng: &mut R) -> Option<(usize, Member)>
    where
        R: Rng + ?Sized,
    {
        let (worse, _) = self.split();
        let Some(&index) = worse.choose(rng) else {
            tracing::warn!(
                members = self.members.len(),
                "no member below the median fitness; nobody killed"
            );
            return None;
        };
        let member = self.members.remove(index);
        tracing::debug!(name = %member.policy.name, fitness = member.fitness, "killed");
        Some((index, member))
    }

    /// Draws one parent, from the upper half with probability
    /// `strong_parent_prob`, otherwise from the lower half.
    ///
    /// An empty half falls back to the other one. Returns `None` only for an
    /// empty population.
    pub fn choose_parent<R>(&self, rng: &mut R) -> Option<&Member>
    where
        R: Rng + ?Sized,
    {
        let (worse, better) = self.split();
        let strong = rng.random_bool(probability(self.params.strong_parent_prob));
        let (preferred, fallback) = if strong {
            (better, worse)
        } else {
            (worse, better)
        };
        let pool = if preferred.is_empty() {
            fallback
        } else {
            preferred
        };
        let &index = pool.choose(rng)?;
        Some(&self.members[index])
    }

    /// Creates a mutated crossover of two chosen parents and advances the id
    /// counter.
    pub fn breed<R>(&mut self, rng: &mut R) -> Result<Policy, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let name = format!("id{}", self.id_counter);
        let mut child = {
            let first = self
                .choose_parent(rng)
                .ok_or(EvolutionError::EmptyPopulation)?;
            let second = self
                .choose_parent(rng)
                .ok_or(EvolutionError::EmptyPopulation)?;
            tracing::debug!(
                first = %first.policy.name,
                second = %second.policy.name,
                child = %name,
                "parents chosen"
            );
            first.policy.crossover(name, &second.policy, rng)
        };
        self.id_counter += 1;
        child.mutate(&self.params.mutation, rng);
        Ok(child)
    }

    /// Runs one kill, breed and evaluate step.
    ///
    /// If breeding or the cohort game fails, the killed member is put back
    /// and the id counter is rewound, so a failed epoch leaves the population
    /// as it was.
    pub fn run_epoch<S, R>(
        &mut self,
        epoch: usize,
        session: &S,
        rng: &mut R,
    ) -> Result<EpochReport, EvolutionError>
    where
        S: GameSession + ?Sized,
        R: Rng + ?Sized,
    {
        let id_counter = self.id_counter;
        let killed = self.remove_below_median(rng);
        let (child, score, cohort) = match self.breed_and_evaluate(epoch, session, rng) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Some((index, member)) = killed {
                    self.members.insert(index, member);
                }
                self.id_counter = id_counter;
                tracing::warn!(epoch, error = %err, "epoch aborted; population restored");
                return Err(err);
            }
        };

        let report = EpochReport {
            epoch,
            killed: killed.map(|(_, member)| member.policy.name),
            child: child.name.clone(),
            score,
            cohort,
        };
        self.members.push(Member {
            policy: child,
            fitness: score,
        });

        tracing::info!(
            epoch,
            killed = ?report.killed,
            child = %report.child,
            score,
            median = ?self.median_fitness(),
            "epoch finished"
        );
        Ok(report)
    }

    /// Breeds a child and plays it with a random cohort. Cohort fitness is
    /// only written once every score is in.
    fn breed_and_evaluate<S, R>(
        &mut self,
        epoch: usize,
        session: &S,
        rng: &mut R,
    ) -> Result<(Policy, i32, Vec<String>), EvolutionError>
    where
        S: GameSession + ?Sized,
        R: Rng + ?Sized,
    {
        let child = self.breed(rng)?;

        let amount = self.params.cohort_size.min(self.members.len());
        let cohort = index::sample(rng, self.members.len(), amount).into_vec();
        let mut policies = cohort
            .iter()
            .map(|&i| self.members[i].policy.clone())
            .collect::<Vec<_>>();
        policies.push(child.clone());

        let scores = evaluate_cohort(session, policies)?;
        for (&i, &score) in cohort.iter().zip(&scores) {
            self.members[i].fitness = score;
        }
        let score = scores[cohort.len()];
        let cohort = cohort
            .iter()
            .map(|&i| self.members[i].policy.name.clone())
            .collect::<Vec<_>>();
        tracing::debug!(epoch, ?cohort, ?scores, "cohort evaluated");
        Ok((child, score, cohort))
    }

    /// Re-scores every member, `batch_size` members per shared game.
    pub fn reevaluate_all<S>(&mut self, session: &S) -> Result<(), EvolutionError>
    where
        S: GameSession + ?Sized,
    {
        let batch_size = self.params.batch_size.max(1);
        for batch in self.members.chunks_mut(batch_size) {
            let policies = batch.iter().map(|member| member.policy.clone()).collect();
            let scores = evaluate_cohort(session, policies)?;
            for (member, score) in batch.iter_mut().zip(scores) {
                member.fitness = score;
            }
        }
        tracing::info!(
            members = self.members.len(),
            median = ?self.median_fitness(),
            "population re-evaluated"
        );
        Ok(())
    }

    /// Runs `n_epochs` epochs, saving a checkpoint whenever the epoch index is
    /// a multiple of `checkpoint_every`.
    pub fn train<S, C, R>(
        &mut self,
        n_epochs: usize,
        session: &S,
        store: &mut C,
        rng: &mut R,
    ) -> Result<Vec<EpochReport>, EvolutionError>
    where
        S: GameSession + ?Sized,
        C: CheckpointStore + ?Sized,
        R: Rng + ?Sized,
    {
        let mut reports = Vec::with_capacity(n_epochs);
        for epoch in 0..n_epochs {
            reports.push(self.run_epoch(epoch, session, rng)?);
            let every = self.params.checkpoint_every;
            if every > 0 && epoch % every == 0 {
                store
                    .save(epoch, &self.to_checkpoint())
                    .map_err(|source| EvolutionError::Checkpoint { epoch, source })?;
            }
        }
        Ok(reports)
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.fitness_values())
    }

    /// A member with the highest fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Member> {
        self.members.iter().max_by_key(|member| member.fitness)
    }

    fn fitness_values(&self) -> Vec<f64> {
        self.members
            .iter()
            .map(|member| f64::from(member.fitness))
            .collect()
    }
}
