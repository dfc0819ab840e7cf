//! Ordered rule lists and their genetic operators.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use hanabi_engine::Action;

use crate::{
    belief::{BeliefEngine, BeliefError},
    mutation::{self, MutationParams},
    rule::{DiscardRule, HintCriterion, HintRule, Rule, SlotCriterion},
};

/// Failure to pick an action for the current turn.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DecisionError {
    #[display("belief query failed")]
    Belief(BeliefError),
    /// Neither a rule nor the fallback produced an action.
    #[display("no rule or fallback produced an action")]
    #[from(ignore)]
    NoAction,
}

/// A named, prioritized list of rules. The first rule that fires decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Policy {
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Picks the action for the current turn.
    ///
    /// Rules are tried in order. When none fires, a hint about any visible
    /// card is tried, then a discard of any slot.
    pub fn choose_action<R>(&self, belief: &BeliefEngine, rng: &mut R) -> Result<Action, DecisionError>
    where
        R: Rng + ?Sized,
    {
        for (priority, rule) in self.rules.iter().enumerate() {
            if let Some(action) = rule.apply(belief, rng)? {
                tracing::trace!(policy = %self.name, priority, %rule, %action, "rule fired");
                return Ok(action);
            }
        }

        let mut fallback = HintRule::new(HintCriterion::Any).apply(belief, rng)?;
        if fallback.is_none() {
            fallback = DiscardRule::new(SlotCriterion::All, 0.0).apply(belief, rng)?;
        }
        match fallback {
            Some(action) => {
                tracing::trace!(policy = %self.name, %action, "fallback fired");
                Ok(action)
            }
            None => Err(DecisionError::NoAction),
        }
    }

    /// Mutates the policy in place.
    ///
    /// Rules are dropped, then each survivor is mutated, then adjacent pairs
    /// are swapped in one left-to-right pass, then a random rule may be
    /// inserted.
    pub fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.rules
            .retain(|_| !mutation::chance(params.drop_rule_prob, rng));
        for rule in &mut self.rules {
            rule.mutate(params, rng);
        }
        for i in 1..self.rules.len() {
            if mutation::chance(params.swap_rule_prob, rng) {
                self.rules.swap(i - 1, i);
            }
        }
        if mutation::chance(params.insert_rule_prob, rng) {
            let index = rng.random_range(0..=self.rules.len());
            self.rules.insert(index, Rule::random(rng));
        }
    }

    /// One-point crossover at a uniformly random cut in
    /// `0..=min(self.rules.len(), other.rules.len())`.
    pub fn crossover<R>(&self, new_name: impl Into<String>, other: &Policy, rng: &mut R) -> Policy
    where
        R: Rng + ?Sized,
    {
        let bound = usize::min(self.rules.len(), other.rules.len());
        let cut = rng.random_range(0..=bound);
        self.crossover_at(new_name, other, cut)
    }

    /// Child with `self.rules[..cut]` followed by `other.rules[cut..]`.
    ///
    /// # Panics
    ///
    /// Panics if `cut` exceeds the length of either rule list.
    #[must_use]
    pub fn crossover_at(&self, new_name: impl Into<String>, other: &Policy, cut: usize) -> Policy {
        let rules = self.rules[..cut]
            .iter()
            .chain(&other.rules[cut..])
            .cloned()
            .collect();
        Policy::new(new_name, rules)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rules)", self.name, self.rules.len())?;
        for (i, rule) in self.rules.iter().enumerate() {
            write!(f, "\n  {:>2}. {rule}", i + 1)?;
        }
        Ok(())
    }
}
