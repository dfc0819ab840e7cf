use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use crate::{CardType, Color};

/// Which attribute of a card a hint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum HintChannel {
    Color,
    Value,
}

impl Distribution<HintChannel> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> HintChannel {
        if rng.random_bool(0.5) {
            HintChannel::Color
        } else {
            HintChannel::Value
        }
    }
}

/// The information carried by a hint: one color or one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Clue {
    #[display("{_0}")]
    Color(Color),
    #[display("{_0}s")]
    Value(u8),
}

impl Clue {
    /// Builds the clue naming `card` on the given channel.
    #[must_use]
    pub fn describing(card: CardType, channel: HintChannel) -> Self {
        match channel {
            HintChannel::Color => Clue::Color(card.color()),
            HintChannel::Value => Clue::Value(card.value()),
        }
    }

    #[must_use]
    pub fn channel(self) -> HintChannel {
        match self {
            Clue::Color(_) => HintChannel::Color,
            Clue::Value(_) => HintChannel::Value,
        }
    }
}

/// A hint as announced by the server after a player gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub source: String,
    pub destination: String,
    pub clue: Clue,
    /// Hand slots of `destination` the clue refers to.
    pub positions: Vec<usize>,
}

/// A move a player may make on its turn.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Action {
    /// Play the card at the given hand slot.
    Play { index: usize },
    /// Discard the card at the given hand slot, regaining a hint token.
    Discard { index: usize },
    /// Spend a hint token to tell `target` about all their cards matching `clue`.
    Hint { target: String, clue: Clue },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Play { index } => write!(f, "play slot {index}"),
            Action::Discard { index } => write!(f, "discard slot {index}"),
            Action::Hint { target, clue } => write!(f, "hint {target}: {clue}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_describing() {
        let card = CardType::new(Color::Green, 4);
        assert_eq!(
            Clue::describing(card, HintChannel::Color),
            Clue::Color(Color::Green)
        );
        assert_eq!(Clue::describing(card, HintChannel::Value), Clue::Value(4));
    }

    #[test]
    fn test_action_display() {
        let hint = Action::Hint {
            target: "bob".to_owned(),
            clue: Clue::Value(1),
        };
        assert_eq!(hint.to_string(), "hint bob: 1s");
        assert_eq!(Action::Play { index: 2 }.to_string(), "play slot 2");
        assert!(Action::Discard { index: 0 }.is_discard());
    }
}
