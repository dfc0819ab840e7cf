//! Belief inference: turning public state and hint history into card statistics.
//!
//! A [`BeliefEngine`] belongs to one player. It combines two sources of
//! information:
//!
//! 1. **Game snapshots** - the public state (stacks, discards, other players'
//!    hands). From these the engine derives the multiset of *unseen* cards: the
//!    full deck minus everything the player can see.
//! 2. **Hint history** - what the player has been told about its own cards,
//!    recorded slot by slot in a [`HandBelief`].
//!
//! # Card Classes
//!
//! Each snapshot classifies the 25 card types into four (overlapping) sets:
//!
//! - **Playable** - value is one above its color's stack height
//! - **Soon playable** - one rank above a playable type
//! - **Useless** - value at or below its color's stack height; can be discarded safely
//! - **Necessary** - exactly one copy of the type remains unseen
//!
//! # Statistics
//!
//! For a card whose identity is known (any card in another player's hand), each
//! [`CardStatistic`] field is 0 or 1. For a slot of the player's own hand, each
//! field is the fraction of unseen cards consistent with what the slot is known
//! to be that belong to the class. Every unseen physical card is weighted
//! equally, so a type with two unseen copies counts twice.
//!
//! ```
//! use hanabi_engine::GameSnapshot;
//! use hanabi_evaluator::belief::BeliefEngine;
//!
//! let mut belief = BeliefEngine::new("alice");
//! belief
//!     .update_game_state(GameSnapshot { hand_size: 5, ..GameSnapshot::default() })
//!     .unwrap();
//!
//! // Nothing is known and nothing is visible: 15 of the 50 cards are 1s.
//! let stats = belief.own_hand_statistics().unwrap();
//! assert_eq!(stats.len(), 5);
//! assert!((stats[0].is_playable - 0.3).abs() < 1e-9);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;
use hanabi_engine::{
    ALL_CARD_TYPES, ALL_CARDS, Card, CardType, Clue, GameSnapshot, Hint, MAX_HAND_SIZE,
};

/// Errors raised by belief queries and updates.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BeliefError {
    /// A statistic was requested before any snapshot was applied.
    #[display("belief queried before any game state was received")]
    NullState,
    /// No unseen card is consistent with what is known about a hand slot.
    #[display("no unseen card is consistent with hand slot {slot}")]
    EmptyBeliefSet { slot: usize },
    /// The snapshot shows more copies of a card than the deck contains.
    #[display("snapshot shows more copies of {card} than the deck holds")]
    InconsistentSnapshot { card: CardType },
    /// A hint position or removed slot lies outside the current hand.
    #[display("hand slot {index} is out of range for a hand of {hand_size} cards")]
    SlotOutOfRange { index: usize, hand_size: usize },
    /// The snapshot reports a hand larger than any Hanabi hand.
    #[display("hand size {size} exceeds the maximum of 5")]
    HandTooLarge { size: usize },
}

/// One of the four classes a card statistic measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardClass {
    Playable,
    SoonPlayable,
    Useless,
    Necessary,
}

/// Class membership of a card, exact (0 or 1) or expected (in `[0, 1]`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardStatistic {
    pub is_playable: f64,
    pub is_soon_playable: f64,
    pub is_useless: f64,
    pub is_necessary: f64,
}

impl CardStatistic {
    #[must_use]
    pub fn get(&self, class: CardClass) -> f64 {
        match class {
            CardClass::Playable => self.is_playable,
            CardClass::SoonPlayable => self.is_soon_playable,
            CardClass::Useless => self.is_useless,
            CardClass::Necessary => self.is_necessary,
        }
    }
}

/// Statistics for every card in another player's hand, in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentHandStatistics {
    pub player: String,
    pub cards: Vec<(CardType, CardStatistic)>,
}

/// What a player knows about each card in its own hand.
///
/// The slot count always matches the current hand size. Slot 0 is the oldest
/// card; drawn cards are appended at the end.
#[derive(Debug, Clone, Default)]
pub struct HandBelief {
    slots: ArrayVec<Card, MAX_HAND_SIZE>,
    last_hinted: ArrayVec<usize, MAX_HAND_SIZE>,
}

impl HandBelief {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slots(&self) -> &[Card] {
        &self.slots
    }

    /// Slots targeted by the most recent hint this player received.
    #[must_use]
    pub fn last_hinted(&self) -> &[usize] {
        &self.last_hinted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grows the hand with unknown slots, or drops trailing slots once the
    /// deck has run out and fewer cards are held.
    pub fn resize(&mut self, size: usize) -> Result<(), BeliefError> {
        if size > MAX_HAND_SIZE {
            return Err(BeliefError::HandTooLarge { size });
        }
        self.slots.truncate(size);
        while self.slots.len() < size {
            self.slots.push(Card::UNKNOWN);
        }
        self.last_hinted.retain(|&mut i| i < size);
        Ok(())
    }

    /// Overwrites the hinted field at every named position.
    ///
    /// Positions are validated before anything is changed.
    pub fn apply_clue(&mut self, clue: Clue, positions: &[usize]) -> Result<(), BeliefError> {
        let hand_size = self.slots.len();
        if let Some(&index) = positions.iter().find(|&&i| i >= hand_size) {
            return Err(BeliefError::SlotOutOfRange { index, hand_size });
        }
        for &pos in positions {
            let slot = &mut self.slots[pos];
            match clue {
                Clue::Color(color) => slot.color = Some(color),
                Clue::Value(value) => slot.value = Some(value),
            }
        }
        self.last_hinted.clear();
        for &pos in positions {
            if !self.last_hinted.contains(&pos) {
                self.last_hinted.push(pos);
            }
        }
        Ok(())
    }

    /// Drops the slot at `index` and appends a fresh unknown slot for the
    /// replacement card.
    pub fn remove(&mut self, index: usize) -> Result<(), BeliefError> {
        let hand_size = self.slots.len();
        if index >= hand_size {
            return Err(BeliefError::SlotOutOfRange { index, hand_size });
        }
        self.slots.remove(index);
        self.slots.push(Card::UNKNOWN);
        self.last_hinted.clear();
        Ok(())
    }
}

/// Card classes derived from one snapshot.
#[derive(Debug, Clone)]
struct DeckKnowledge {
    unseen: BTreeMap<CardType, u8>,
    playable: BTreeSet<CardType>,
    soon_playable: BTreeSet<CardType>,
    useless: BTreeSet<CardType>,
    necessary: BTreeSet<CardType>,
}

impl DeckKnowledge {
    fn new(snapshot: &GameSnapshot, viewer: &str) -> Result<Self, BeliefError> {
        let mut unseen = BTreeMap::new();
        for card in ALL_CARDS {
            *unseen.entry(card).or_insert(0_u8) += 1;
        }

        let visible = snapshot
            .stacks
            .iter()
            .flatten()
            .chain(&snapshot.discard_pile)
            .chain(
                snapshot
                    .players
                    .iter()
                    .filter(|p| p.name != viewer)
                    .flat_map(|p| &p.cards),
            );
        for &card in visible {
            let count = unseen
                .get_mut(&card)
                .filter(|count| **count > 0)
                .ok_or(BeliefError::InconsistentSnapshot { card })?;
            *count -= 1;
        }

        let playable: BTreeSet<_> = ALL_CARD_TYPES
            .into_iter()
            .filter(|card| {
                !snapshot.is_stack_complete(card.color())
                    && card.value() == snapshot.stack_height(card.color()) + 1
            })
            .collect();
        let soon_playable = playable.iter().filter_map(|card| card.next_rank()).collect();
        let useless = ALL_CARD_TYPES
            .into_iter()
            .filter(|card| card.value() <= snapshot.stack_height(card.color()))
            .collect();
        let necessary = unseen
            .iter()
            .filter(|&(_, &count)| count == 1)
            .map(|(&card, _)| card)
            .collect();

        Ok(Self {
            unseen,
            playable,
            soon_playable,
            useless,
            necessary,
        })
    }

    fn exact(&self, card: CardType) -> CardStatistic {
        let indicator = |set: &BTreeSet<CardType>| if set.contains(&card) { 1.0 } else { 0.0 };
        CardStatistic {
            is_playable: indicator(&self.playable),
            is_soon_playable: indicator(&self.soon_playable),
            is_useless: indicator(&self.useless),
            is_necessary: indicator(&self.necessary),
        }
    }

    fn expected(&self, belief: &Card, slot: usize) -> Result<CardStatistic, BeliefError> {
        let mut total = 0_u32;
        let mut sum = CardStatistic::default();
        for (&card, &count) in &self.unseen {
            if count == 0 || !belief.could_be(card) {
                continue;
            }
            let weight = f64::from(count);
            let exact = self.exact(card);
            total += u32::from(count);
            sum.is_playable += weight * exact.is_playable;
            sum.is_soon_playable += weight * exact.is_soon_playable;
            sum.is_useless += weight * exact.is_useless;
            sum.is_necessary += weight * exact.is_necessary;
        }
        if total == 0 {
            return Err(BeliefError::EmptyBeliefSet { slot });
        }
        let total = f64::from(total);
        Ok(CardStatistic {
            is_playable: sum.is_playable / total,
            is_soon_playable: sum.is_soon_playable / total,
            is_useless: sum.is_useless / total,
            is_necessary: sum.is_necessary / total,
        })
    }
}

/// Per-player belief state over the game.
#[derive(Debug, Clone)]
pub struct BeliefEngine {
    player: String,
    hand: HandBelief,
    snapshot: Option<GameSnapshot>,
    knowledge: Option<DeckKnowledge>,
}

impl BeliefEngine {
    #[must_use]
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            hand: HandBelief::new(),
            snapshot: None,
            knowledge: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    #[must_use]
    pub fn hand(&self) -> &HandBelief {
        &self.hand
    }

    /// Returns the most recent snapshot.
    pub fn snapshot(&self) -> Result<&GameSnapshot, BeliefError> {
        self.snapshot.as_ref().ok_or(BeliefError::NullState)
    }

    pub fn hint_tokens(&self) -> Result<u8, BeliefError> {
        Ok(self.snapshot()?.hint_tokens)
    }

    /// Applies a new public snapshot and recomputes the derived card classes.
    ///
    /// On error the previous state is kept.
    pub fn update_game_state(&mut self, snapshot: GameSnapshot) -> Result<(), BeliefError> {
        let knowledge = DeckKnowledge::new(&snapshot, &self.player)?;
        self.hand.resize(snapshot.hand_size)?;
        self.knowledge = Some(knowledge);
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Records a hint. Hints addressed to other players are ignored.
    pub fn record_hint(&mut self, hint: &Hint) -> Result<(), BeliefError> {
        if hint.destination != self.player {
            return Ok(());
        }
        self.hand.apply_clue(hint.clue, &hint.positions)
    }

    /// Records that the card in slot `index` left this player's hand.
    pub fn record_card_played(&mut self, index: usize) -> Result<(), BeliefError> {
        self.hand.remove(index)
    }

    fn knowledge(&self) -> Result<&DeckKnowledge, BeliefError> {
        self.knowledge.as_ref().ok_or(BeliefError::NullState)
    }

    /// Exact statistics for every card held by every other player.
    pub fn opponent_hand_statistics(&self) -> Result<Vec<OpponentHandStatistics>, BeliefError> {
        let knowledge = self.knowledge()?;
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .players
            .iter()
            .filter(|p| p.name != self.player)
            .map(|p| OpponentHandStatistics {
                player: p.name.clone(),
                cards: p
                    .cards
                    .iter()
                    .map(|&card| (card, knowledge.exact(card)))
                    .collect(),
            })
            .collect())
    }

    /// Expected statistics for one slot of the player's own hand.
    pub fn own_slot_statistic(&self, slot: usize) -> Result<CardStatistic, BeliefError> {
        let knowledge = self.knowledge()?;
        let belief = self
            .hand
            .slots()
            .get(slot)
            .ok_or(BeliefError::SlotOutOfRange {
                index: slot,
                hand_size: self.hand.len(),
            })?;
        knowledge.expected(belief, slot)
    }

    /// Expected statistics for every slot of the player's own hand.
    pub fn own_hand_statistics(&self) -> Result<Vec<CardStatistic>, BeliefError> {
        let knowledge = self.knowledge()?;
        self.hand
            .slots()
            .iter()
            .enumerate()
            .map(|(slot, belief)| knowledge.expected(belief, slot))
            .collect()
    }
}
