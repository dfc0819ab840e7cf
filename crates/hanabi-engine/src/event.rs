use crate::{GameSnapshot, Hint};

/// Notifications a player receives while a game is in progress.
///
/// A game session translates whatever the server sends into these events and
/// feeds them, in order, to each participating player.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// Fresh public state; always delivered before a player is asked to act.
    StateUpdated(GameSnapshot),
    /// Someone gave a hint.
    HintGiven(Hint),
    /// `player` successfully played the card at `index`.
    CardPlayed { player: String, index: usize },
    /// `player` discarded the card at `index`.
    CardDiscarded { player: String, index: usize },
    /// `player` played the card at `index` but it did not fit; a storm token was lost.
    CardMisplayed { player: String, index: usize },
    /// The game has ended with the given team score.
    GameOver { score: i32 },
}

impl GameEvent {
    /// Returns the player and slot if this event removed a card from a hand.
    #[must_use]
    pub fn removed_card(&self) -> Option<(&str, usize)> {
        match self {
            GameEvent::CardPlayed { player, index }
            | GameEvent::CardDiscarded { player, index }
            | GameEvent::CardMisplayed { player, index } => Some((player, *index)),
            GameEvent::StateUpdated(_) | GameEvent::HintGiven(_) | GameEvent::GameOver { .. } => {
                None
            }
        }
    }
}
