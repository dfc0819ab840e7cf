use crate::{CardType, Color, MAX_HINT_TOKENS, MAX_VALUE};

/// The cards held by one player, as visible to everybody else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHand {
    pub name: String,
    pub cards: Vec<CardType>,
}

impl PlayerHand {
    #[must_use]
    pub fn new(name: impl Into<String>, cards: Vec<CardType>) -> Self {
        Self {
            name: name.into(),
            cards,
        }
    }
}

/// Public game state as delivered to one player.
///
/// The snapshot lists the exact cards in every other player's hand. Servers
/// normally omit the viewer's own hand; if an entry for the viewer is present
/// it is ignored by the belief engine, since a player may only reason about
/// its own cards through hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Played cards, one stack per color in [`Color::ALL`] order.
    pub stacks: [Vec<CardType>; Color::LEN],
    pub discard_pile: Vec<CardType>,
    pub players: Vec<PlayerHand>,
    /// Hint tokens currently available to the team.
    pub hint_tokens: u8,
    pub storm_tokens_used: u8,
    /// Number of cards in the viewing player's own hand.
    pub hand_size: usize,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            stacks: Default::default(),
            discard_pile: Vec::new(),
            players: Vec::new(),
            hint_tokens: MAX_HINT_TOKENS,
            storm_tokens_used: 0,
            hand_size: 0,
        }
    }
}

impl GameSnapshot {
    #[must_use]
    pub fn stack(&self, color: Color) -> &[CardType] {
        &self.stacks[color.as_usize()]
    }

    /// Number of cards played on the given color.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn stack_height(&self, color: Color) -> u8 {
        self.stack(color).len().min(usize::from(MAX_VALUE)) as u8
    }

    #[must_use]
    pub fn is_stack_complete(&self, color: Color) -> bool {
        self.stack_height(color) >= MAX_VALUE
    }
}
