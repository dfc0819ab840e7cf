//! Core data model for the cooperative card game Hanabi.
//!
//! This crate holds the vocabulary shared by the belief engine, the rule-based
//! policies, and the training system. It models only what a player can observe;
//! the rules engine that validates moves and advances turns lives on the game
//! server and is not part of this workspace.
//!
//! # Modules
//!
//! - [`card`] - Colors, exact and partially-known cards, deck composition
//! - [`snapshot`] - Public game state as seen by one player
//! - [`action`] - Hints and the actions a player may take on its turn
//! - [`event`] - Notifications a player receives while a game is running
//!
//! # Deck
//!
//! The deck holds 50 cards: for each of the five colors, three 1s, two each of
//! 2, 3 and 4, and a single 5. There are 25 distinct card types.
//!
//! ```
//! use hanabi_engine::{ALL_CARDS, ALL_CARD_TYPES, CardType, Color};
//!
//! assert_eq!(ALL_CARDS.len(), 50);
//! assert_eq!(ALL_CARD_TYPES.len(), 25);
//!
//! let red_five = CardType::new(Color::Red, 5);
//! assert_eq!(ALL_CARDS.iter().filter(|c| **c == red_five).count(), 1);
//! ```
//!
//! # Partial Knowledge
//!
//! A player never sees its own hand. What it knows about each of its cards is a
//! [`Card`] whose color and value may each be absent:
//!
//! ```
//! use hanabi_engine::{Card, CardType, Color};
//!
//! let hinted_red = Card { color: Some(Color::Red), value: None };
//! assert!(hinted_red.could_be(CardType::new(Color::Red, 3)));
//! assert!(!hinted_red.could_be(CardType::new(Color::Blue, 3)));
//!
//! // Equality needs full knowledge on both sides.
//! assert_ne!(hinted_red, hinted_red);
//! ```

pub use self::{action::*, card::*, event::*, snapshot::*};

pub mod action;
pub mod card;
pub mod event;
pub mod snapshot;

/// Maximum number of hint tokens available to the team.
pub const MAX_HINT_TOKENS: u8 = 8;

/// Largest hand a player can hold (two- and three-player games).
pub const MAX_HAND_SIZE: usize = 5;
