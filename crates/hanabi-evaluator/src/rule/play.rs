use rand::Rng;

use hanabi_engine::Action;

use crate::{
    belief::{BeliefError, BeliefEngine},
    mutation::{self, MutationParams},
};

use super::SlotCriterion;

/// Plays the most probably playable candidate slot, if it clears the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRule {
    pub(super) criterion: SlotCriterion,
    pub(super) threshold: f64,
}

impl PlayRule {
    /// Creates a play rule; `threshold` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(criterion: SlotCriterion, threshold: f64) -> Self {
        Self {
            criterion,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn criterion(&self) -> SlotCriterion {
        self.criterion
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Among candidate slots whose playability reaches the threshold, plays the
    /// one with the highest playability (lowest index on ties).
    ///
    /// Returns `Ok(None)` when no candidate qualifies. Fails with
    /// [`BeliefError::NullState`] before the first snapshot.
    pub fn apply(&self, belief: &BeliefEngine) -> Result<Option<Action>, BeliefError> {
        belief.snapshot()?;
        let mut best: Option<(usize, f64)> = None;
        for slot in self.criterion.select(belief.hand()) {
            let playability = belief.own_slot_statistic(slot)?.is_playable;
            if playability < self.threshold {
                continue;
            }
            if best.is_none_or(|(_, best)| playability > best) {
                best = Some((slot, playability));
            }
        }
        Ok(best.map(|(index, _)| Action::Play { index }))
    }

    /// Perturbs the threshold with `N(0, threshold_sigma)` noise, clamped to
    /// `[0, 1]`, then replaces the criterion with probability
    /// `criterion_swap_prob`.
    pub fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.threshold = mutation::perturb_probability(self.threshold, params.threshold_sigma, rng);
        if mutation::chance(params.criterion_swap_prob, rng) {
            self.criterion = rng.random();
        }
    }

    /// Uniformly random criterion and a threshold drawn from `[0, 1)`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(rng.random(), rng.random())
    }
}
