use rand::{Rng, seq::IndexedRandom};

use hanabi_engine::{Action, MAX_HINT_TOKENS};

use crate::{
    belief::{BeliefError, BeliefEngine},
    mutation::{self, MutationParams},
};

use super::SlotCriterion;

/// Discards a random candidate slot that is likely enough to be useless.
///
/// Never fires while the hint token pool is full, since the discard would
/// not recover a token.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardRule {
    pub(super) criterion: SlotCriterion,
    pub(super) threshold: f64,
}

impl DiscardRule {
    /// Creates a discard rule; `threshold` is clamped to `[0, 1]`.
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

    /// Discards a uniformly chosen candidate slot whose chance of being
    /// useless reaches the threshold.
    ///
    /// Declines while the hint token pool is full, and when no candidate
    /// qualifies.
    pub fn apply<R>(&self, belief: &BeliefEngine, rng: &mut R) -> Result<Option<Action>, BeliefError>
    where
        R: Rng + ?Sized,
    {
        if belief.hint_tokens()? >= MAX_HINT_TOKENS {
            return Ok(None);
        }
        let mut survivors = vec![];
        for slot in self.criterion.select(belief.hand()) {
            if belief.own_slot_statistic(slot)?.is_useless >= self.threshold {
                survivors.push(slot);
            }
        }
        Ok(survivors
            .choose(rng)
            .map(|&index| Action::Discard { index }))
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

#[cfg(test)]
mod tests {
    use hanabi_engine::{CardType, Clue, Color, GameSnapshot, Hint};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn belief(hint_tokens: u8) -> BeliefEngine {
        let mut snapshot = GameSnapshot {
            hint_tokens,
            hand_size: 5,
            ..GameSnapshot::default()
        };
        snapshot.stacks[Color::Green.as_usize()] = vec![
            CardType::new(Color::Green, 1),
            CardType::new(Color::Green, 2),
        ];
        let mut belief = BeliefEngine::new("alice");
        belief.update_game_state(snapshot).unwrap();
        belief
            .record_hint(&Hint {
                source: "bob".to_owned(),
                destination: "alice".to_owned(),
                clue: Clue::Color(Color::Green),
                positions: vec![1, 4],
            })
            .unwrap();
        belief
            .record_hint(&Hint {
                source: "bob".to_owned(),
                destination: "alice".to_owned(),
                clue: Clue::Value(2),
                positions: vec![1],
            })
            .unwrap();
        belief
    }

    #[test]
    fn test_never_discards_with_full_hint_tokens() {
        let belief = belief(MAX_HINT_TOKENS);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        for criterion in SlotCriterion::ALL {
            for threshold in [0.0, 0.5, 1.0] {
                let rule = DiscardRule::new(criterion, threshold);
                assert_eq!(rule.apply(&belief, &mut rng).unwrap(), None);
            }
        }
    }

    #[test]
    fn test_discards_known_useless_card() {
        let belief = belief(3);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        // Slot 1 is a green 2, already played.
        let rule = DiscardRule::new(SlotCriterion::All, 1.0);
        for _ in 0..20 {
            assert_eq!(
                rule.apply(&belief, &mut rng).unwrap(),
                Some(Action::Discard { index: 1 })
            );
        }
    }

    #[test]
    fn test_random_choice_among_survivors() {
        let belief = belief(3);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let rule = DiscardRule::new(SlotCriterion::All, 0.0);
        let mut seen = [false; 5];
        for _ in 0..200 {
            match rule.apply(&belief, &mut rng).unwrap() {
                Some(Action::Discard { index }) => seen[index] = true,
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_no_survivor_yields_none() {
        let belief = belief(3);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        // Slot 4 is green but of unknown value; green 1 and 2 are useless,
        // so it is useless with probability below one.
        let rule = DiscardRule::new(SlotCriterion::Newest, 1.0);
        assert_eq!(rule.apply(&belief, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let belief = belief(3);
        let rule = DiscardRule::new(SlotCriterion::All, 0.0);
        let a = rule.apply(&belief, &mut Pcg64Mcg::seed_from_u64(42)).unwrap();
        let b = rule.apply(&belief, &mut Pcg64Mcg::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
