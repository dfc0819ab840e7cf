use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use crate::belief::{CardClass, CardStatistic, HandBelief};

/// Which of its own hand slots a Play or Discard rule considers.
///
/// The discriminants are the criterion ids used in checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotCriterion {
    /// Slots named by the most recent hint to this player.
    LastHinted = 1,
    /// The most recently drawn slot.
    Newest = 2,
    /// The slot held longest.
    Oldest = 3,
    /// The first slot carrying the highest known value.
    Highest = 4,
    /// The first slot carrying the lowest known value.
    Lowest = 5,
    /// Every slot.
    All = 6,
}

impl Distribution<SlotCriterion> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SlotCriterion {
        SlotCriterion::ALL[rng.random_range(0..SlotCriterion::ALL.len())]
    }
}

impl SlotCriterion {
    pub const ALL: [SlotCriterion; 6] = [
        SlotCriterion::LastHinted,
        SlotCriterion::Newest,
        SlotCriterion::Oldest,
        SlotCriterion::Highest,
        SlotCriterion::Lowest,
        SlotCriterion::All,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Returns the candidate slots, ascending and without duplicates.
    ///
    /// `Highest` and `Lowest` select nothing when no slot has a known value.
    #[must_use]
    pub fn select(self, hand: &HandBelief) -> Vec<usize> {
        let len = hand.len();
        match self {
            SlotCriterion::LastHinted => {
                let mut slots: Vec<_> = hand
                    .last_hinted()
                    .iter()
                    .copied()
                    .filter(|&i| i < len)
                    .collect();
                slots.sort_unstable();
                slots.dedup();
                slots
            }
            SlotCriterion::Newest => len.checked_sub(1).into_iter().collect(),
            SlotCriterion::Oldest => (len > 0).then_some(0).into_iter().collect(),
            SlotCriterion::Highest => known_values(hand)
                // `max_by_key` keeps the last maximum; reverse to keep the first.
                .rev()
                .max_by_key(|&(_, value)| value)
                .map(|(slot, _)| slot)
                .into_iter()
                .collect(),
            SlotCriterion::Lowest => known_values(hand)
                .min_by_key(|&(_, value)| value)
                .map(|(slot, _)| slot)
                .into_iter()
                .collect(),
            SlotCriterion::All => (0..len).collect(),
        }
    }
}

fn known_values(hand: &HandBelief) -> impl DoubleEndedIterator<Item = (usize, u8)> + '_ {
    hand.slots()
        .iter()
        .enumerate()
        .filter_map(|(slot, card)| card.value.map(|value| (slot, value)))
}

impl fmt::Display for SlotCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotCriterion::LastHinted => "last-hinted",
            SlotCriterion::Newest => "newest",
            SlotCriterion::Oldest => "oldest",
            SlotCriterion::Highest => "highest",
            SlotCriterion::Lowest => "lowest",
            SlotCriterion::All => "any slot",
        };
        f.write_str(name)
    }
}

/// Which visible cards a Hint rule is willing to hint about.
///
/// The discriminants are the criterion ids used in checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HintCriterion {
    Playable = 1,
    SoonPlayable = 2,
    Useless = 3,
    Necessary = 4,
    /// Any visible card.
    Any = 5,
}

impl Distribution<HintCriterion> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> HintCriterion {
        HintCriterion::ALL[rng.random_range(0..HintCriterion::ALL.len())]
    }
}

impl HintCriterion {
    pub const ALL: [HintCriterion; 5] = [
        HintCriterion::Playable,
        HintCriterion::SoonPlayable,
        HintCriterion::Useless,
        HintCriterion::Necessary,
        HintCriterion::Any,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn class(self) -> Option<CardClass> {
        match self {
            HintCriterion::Playable => Some(CardClass::Playable),
            HintCriterion::SoonPlayable => Some(CardClass::SoonPlayable),
            HintCriterion::Useless => Some(CardClass::Useless),
            HintCriterion::Necessary => Some(CardClass::Necessary),
            HintCriterion::Any => None,
        }
    }

    /// Tests an exact statistic, whose fields are 0 or 1.
    #[must_use]
    pub fn matches(self, statistic: &CardStatistic) -> bool {
        self.class().is_none_or(|class| statistic.get(class) >= 1.0)
    }
}

impl fmt::Display for HintCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HintCriterion::Playable => "playable",
            HintCriterion::SoonPlayable => "soon-playable",
            HintCriterion::Useless => "useless",
            HintCriterion::Necessary => "necessary",
            HintCriterion::Any => "any card",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use hanabi_engine::{Clue, Color};

    use super::*;

    fn hand_with_values(values: &[Option<u8>]) -> HandBelief {
        let mut hand = HandBelief::new();
        hand.resize(values.len()).unwrap();
        for (slot, value) in values.iter().enumerate() {
            if let Some(value) = value {
                hand.apply_clue(Clue::Value(*value), &[slot]).unwrap();
            }
        }
        hand
    }

    #[test]
    fn test_positional_criteria() {
        let hand = hand_with_values(&[None; 4]);
        assert_eq!(SlotCriterion::Newest.select(&hand), vec![3]);
        assert_eq!(SlotCriterion::Oldest.select(&hand), vec![0]);
        assert_eq!(SlotCriterion::All.select(&hand), vec![0, 1, 2, 3]);
        assert!(SlotCriterion::LastHinted.select(&hand).is_empty());

        let empty = HandBelief::new();
        for criterion in SlotCriterion::ALL {
            assert!(criterion.select(&empty).is_empty(), "{criterion}");
        }
    }

    #[test]
    fn test_last_hinted_is_sorted() {
        let mut hand = hand_with_values(&[None; 5]);
        hand.apply_clue(Clue::Color(Color::Red), &[3, 1, 3]).unwrap();
        assert_eq!(SlotCriterion::LastHinted.select(&hand), vec![1, 3]);
    }

    #[test]
    fn test_highest_and_lowest_pick_first_extreme() {
        let hand = hand_with_values(&[Some(2), None, Some(4), Some(4), Some(2)]);
        assert_eq!(SlotCriterion::Highest.select(&hand), vec![2]);
        assert_eq!(SlotCriterion::Lowest.select(&hand), vec![0]);
    }

    #[test]
    fn test_highest_and_lowest_without_known_values() {
        let hand = hand_with_values(&[None; 5]);
        assert!(SlotCriterion::Highest.select(&hand).is_empty());
        assert!(SlotCriterion::Lowest.select(&hand).is_empty());
    }

    #[test]
    fn test_criterion_ids_round_trip() {
        for criterion in SlotCriterion::ALL {
            assert_eq!(SlotCriterion::from_id(criterion.id()), Some(criterion));
        }
        for criterion in HintCriterion::ALL {
            assert_eq!(HintCriterion::from_id(criterion.id()), Some(criterion));
        }
        assert_eq!(SlotCriterion::from_id(0), None);
        assert_eq!(SlotCriterion::from_id(7), None);
        assert_eq!(HintCriterion::from_id(6), None);
    }

    #[test]
    fn test_hint_criterion_matches() {
        let playable = CardStatistic {
            is_playable: 1.0,
            ..CardStatistic::default()
        };
        assert!(HintCriterion::Playable.matches(&playable));
        assert!(!HintCriterion::Useless.matches(&playable));
        assert!(HintCriterion::Any.matches(&CardStatistic::default()));
    }
}
