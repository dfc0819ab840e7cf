use rand::{Rng, seq::IndexedRandom};

use hanabi_engine::{Action, Clue, HintChannel};

use crate::{
    belief::{BeliefError, BeliefEngine},
    mutation::{self, MutationParams},
};

use super::HintCriterion;

/// Hints a random visible card that satisfies the criterion.
///
/// The hint names either the card's color or its value, each with equal
/// probability.
#[derive(Debug, Clone, PartialEq)]
pub struct HintRule {
    pub(super) criterion: HintCriterion,
}

impl HintRule {
    #[must_use]
    pub fn new(criterion: HintCriterion) -> Self {
        Self { criterion }
    }

    #[must_use]
    pub fn criterion(&self) -> HintCriterion {
        self.criterion
    }

    /// Picks a uniformly random card, across all other players' hands, that
    /// matches the criterion and hints its color or value.
    ///
    /// Declines without a hint token or without a matching card.
    pub fn apply<R>(&self, belief: &BeliefEngine, rng: &mut R) -> Result<Option<Action>, BeliefError>
    where
        R: Rng + ?Sized,
    {
        if belief.hint_tokens()? == 0 {
            return Ok(None);
        }
        let hands = belief.opponent_hand_statistics()?;
        let candidates: Vec<_> = hands
            .iter()
            .flat_map(|hand| {
                hand.cards
                    .iter()
                    .filter(|(_, statistic)| self.criterion.matches(statistic))
                    .map(move |&(card, _)| (hand.player.as_str(), card))
            })
            .collect();
        let Some(&(target, card)) = candidates.choose(rng) else {
            return Ok(None);
        };
        let channel: HintChannel = rng.random();
        Ok(Some(Action::Hint {
            target: target.to_owned(),
            clue: Clue::describing(card, channel),
        }))
    }

    /// Replaces the criterion with probability `criterion_swap_prob`.
    pub fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if mutation::chance(params.criterion_swap_prob, rng) {
            self.criterion = rng.random();
        }
    }

    /// A hint rule with a uniformly random criterion.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(rng.random())
    }
}

#[cfg(test)]
mod tests {
    use hanabi_engine::{CardType, Color, GameSnapshot, PlayerHand};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn belief(hint_tokens: u8) -> BeliefEngine {
        let mut belief = BeliefEngine::new("alice");
        belief
            .update_game_state(GameSnapshot {
                players: vec![
                    PlayerHand::new(
                        "bob",
                        vec![CardType::new(Color::Red, 4), CardType::new(Color::Blue, 1)],
                    ),
                    PlayerHand::new("carol", vec![CardType::new(Color::Yellow, 3)]),
                ],
                hint_tokens,
                hand_size: 5,
                ..GameSnapshot::default()
            })
            .unwrap();
        belief
    }

    #[test]
    fn test_never_hints_without_tokens() {
        let belief = belief(0);
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for criterion in HintCriterion::ALL {
            assert_eq!(
                HintRule::new(criterion).apply(&belief, &mut rng).unwrap(),
                None
            );
        }
    }

    #[test]
    fn test_hints_the_only_playable_card() {
        let belief = belief(4);
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let rule = HintRule::new(HintCriterion::Playable);
        for _ in 0..20 {
            match rule.apply(&belief, &mut rng).unwrap() {
                Some(Action::Hint { target, clue }) => {
                    assert_eq!(target, "bob");
                    assert!(clue == Clue::Color(Color::Blue) || clue == Clue::Value(1));
                }
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_matching_card_yields_none() {
        let belief = belief(4);
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let rule = HintRule::new(HintCriterion::Useless);
        assert_eq!(rule.apply(&belief, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_any_reaches_every_player() {
        let belief = belief(4);
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let rule = HintRule::new(HintCriterion::Any);
        let mut targets = std::collections::BTreeSet::new();
        let mut channels = std::collections::BTreeSet::new();
        for _ in 0..200 {
            if let Some(Action::Hint { target, clue }) = rule.apply(&belief, &mut rng).unwrap() {
                targets.insert(target);
                channels.insert(clue.channel().is_color());
            }
        }
        assert_eq!(targets.len(), 2);
        assert_eq!(channels.len(), 2);
    }
}
