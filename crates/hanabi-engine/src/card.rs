use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// Highest card value.
pub const MAX_VALUE: u8 = 5;

/// Number of physical copies of each value within one color, indexed by `value - 1`.
pub const COPIES_PER_VALUE: [u8; MAX_VALUE as usize] = [3, 2, 2, 2, 1];

/// Card color (suit).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
#[repr(u8)]
pub enum Color {
    #[display("red")]
    Red = 0,
    #[display("yellow")]
    Yellow = 1,
    #[display("green")]
    Green = 2,
    #[display("blue")]
    Blue = 3,
    #[display("white")]
    White = 4,
}

impl Distribution<Color> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        Color::ALL[rng.random_range(0..Color::LEN)]
    }
}

impl Color {
    /// Number of colors (5).
    pub const LEN: usize = 5;

    /// All colors in stack order.
    pub const ALL: [Color; Self::LEN] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::White,
    ];

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self as usize
    }
}

/// A fully identified card: one of the 25 (color, value) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardType {
    color: Color,
    value: u8,
}

impl CardType {
    /// Creates a card type.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in `1..=5`.
    #[must_use]
    pub const fn new(color: Color, value: u8) -> Self {
        assert!(value >= 1 && value <= MAX_VALUE, "card value must be in 1..=5");
        Self { color, value }
    }

    /// Creates a card type, returning `None` for an out-of-range value.
    #[must_use]
    pub const fn try_new(color: Color, value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_VALUE {
            Some(Self { color, value })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Returns the card one rank above this one in the same color, if any.
    #[must_use]
    pub const fn next_rank(self) -> Option<Self> {
        Self::try_new(self.color, self.value + 1)
    }

    /// Number of copies of this type in a full deck.
    #[must_use]
    pub const fn copies_in_deck(self) -> u8 {
        COPIES_PER_VALUE[(self.value - 1) as usize]
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.value)
    }
}

/// Every physical card of the deck (50 entries).
pub const ALL_CARDS: [CardType; 50] = {
    let mut cards = [CardType::new(Color::Red, 1); 50];
    let mut i = 0;
    let mut c = 0;
    while c < Color::LEN {
        let mut value = 1;
        while value <= MAX_VALUE {
            let card = CardType::new(Color::ALL[c], value);
            let mut copy = 0;
            while copy < card.copies_in_deck() {
                cards[i] = card;
                i += 1;
                copy += 1;
            }
            value += 1;
        }
        c += 1;
    }
    assert!(i == 50);
    cards
};

/// Every distinct card type (25 entries), grouped by color.
pub const ALL_CARD_TYPES: [CardType; 25] = {
    let mut types = [CardType::new(Color::Red, 1); 25];
    let mut i = 0;
    let mut c = 0;
    while c < Color::LEN {
        let mut value = 1;
        while value <= MAX_VALUE {
            types[i] = CardType::new(Color::ALL[c], value);
            i += 1;
            value += 1;
        }
        c += 1;
    }
    types
};

/// A card as far as a player knows it.
///
/// Either field may be absent. Two `Card`s are equal only when both are
/// fully known and identical, so a partial card is not even equal to itself;
/// use [`Card::could_equal`] for reasoning under uncertainty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Card {
    pub color: Option<Color>,
    pub value: Option<u8>,
}

impl Card {
    /// A card about which nothing is known.
    pub const UNKNOWN: Self = Self {
        color: None,
        value: None,
    };

    #[must_use]
    pub const fn exact(card: CardType) -> Self {
        Self {
            color: Some(card.color),
            value: Some(card.value),
        }
    }

    /// Returns the exact card type if both fields are known.
    #[must_use]
    pub fn as_type(self) -> Option<CardType> {
        CardType::try_new(self.color?, self.value?)
    }

    /// Equality under incomplete information.
    ///
    /// A field only rules out a match when both sides specify it and the values
    /// differ. This relation is reflexive and symmetric but not transitive.
    #[must_use]
    pub fn could_equal(&self, other: &Card) -> bool {
        fn field_matches<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
        }
        field_matches(self.color, other.color) && field_matches(self.value, other.value)
    }

    /// Returns `true` if this card is consistent with the given exact type.
    #[must_use]
    pub fn could_be(&self, card: CardType) -> bool {
        self.could_equal(&Card::exact(card))
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_type(), other.as_type()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CardType> for Card {
    fn from(card: CardType) -> Self {
        Self::exact(card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{color}")?,
            None => write!(f, "?")?,
        }
        match self.value {
            Some(value) => write!(f, " {value}"),
            None => write!(f, " ?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    const PARTIALS: [Card; 6] = [
        Card::UNKNOWN,
        Card {
            color: Some(Color::Red),
            value: None,
        },
        Card {
            color: None,
            value: Some(3),
        },
        Card {
            color: Some(Color::Red),
            value: Some(3),
        },
        Card {
            color: Some(Color::Blue),
            value: Some(3),
        },
        Card {
            color: Some(Color::Blue),
            value: None,
        },
    ];

    #[test]
    fn test_all_cards_composition() {
        assert_eq!(ALL_CARDS.len(), 50);

        let mut counts = BTreeMap::new();
        for card in ALL_CARDS {
            *counts.entry(card).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 25);
        for color in Color::ALL {
            assert_eq!(counts[&CardType::new(color, 1)], 3);
            assert_eq!(counts[&CardType::new(color, 2)], 2);
            assert_eq!(counts[&CardType::new(color, 3)], 2);
            assert_eq!(counts[&CardType::new(color, 4)], 2);
            assert_eq!(counts[&CardType::new(color, 5)], 1);
        }
    }

    #[test]
    fn test_all_card_types_unique() {
        let mut types = ALL_CARD_TYPES.to_vec();
        types.sort();
        types.dedup();
        assert_eq!(types.len(), 25);
    }

    #[test]
    fn test_could_equal_reflexive_and_symmetric() {
        for a in PARTIALS {
            assert!(a.could_equal(&a), "{a} should could_equal itself");
            for b in PARTIALS {
                assert_eq!(a.could_equal(&b), b.could_equal(&a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_could_equal_not_transitive() {
        let red = PARTIALS[1];
        let three = PARTIALS[2];
        let blue_three = PARTIALS[4];
        assert!(red.could_equal(&three));
        assert!(three.could_equal(&blue_three));
        assert!(!red.could_equal(&blue_three));
    }

    #[test]
    fn test_equality_requires_full_knowledge() {
        let red = PARTIALS[1];
        assert_ne!(red, red);
        assert_ne!(Card::UNKNOWN, Card::UNKNOWN);

        let red_three = Card::exact(CardType::new(Color::Red, 3));
        assert_eq!(red_three, PARTIALS[3]);
        assert_ne!(red_three, PARTIALS[4]);
    }

    #[test]
    fn test_next_rank() {
        assert_eq!(
            CardType::new(Color::Green, 4).next_rank(),
            Some(CardType::new(Color::Green, 5))
        );
        assert_eq!(CardType::new(Color::Green, 5).next_rank(), None);
    }
}
