//! Rule-based decision primitives.
//!
//! A [`Rule`] looks at a player's [`BeliefEngine`] and either proposes an
//! [`Action`] or declines. There are exactly three kinds:
//!
//! | kind      | `rule_type` | parameters              | fires when                                           |
//! |-----------|-------------|-------------------------|------------------------------------------------------|
//! | Play      | 1           | slot criterion, threshold | a candidate slot is playable with probability ≥ threshold |
//! | Discard   | 2           | slot criterion, threshold | hint tokens are not full and a candidate is useless with probability ≥ threshold |
//! | Hint      | 3           | hint criterion          | a hint token is available and a visible card matches |
//!
//! Slot criteria (ids 1-6) pick candidate slots of the player's own hand; see
//! [`SlotCriterion`]. Hint criteria (ids 1-5) classify cards in other players'
//! hands; see [`HintCriterion`].
//!
//! # Serialization
//!
//! Rules serialize to the compact checkpoint form
//!
//! ```json
//! {"rule_type": 1, "criterion": 6, "threshold": 0.95}
//! ```
//!
//! where `threshold` is present for Play and Discard only. Unknown kinds,
//! unknown criteria and missing or out-of-range thresholds are rejected with
//! [`MalformedCheckpoint`] rather than replaced with a default.
//!
//! ```
//! use hanabi_evaluator::rule::{Rule, SlotCriterion};
//!
//! let rule: Rule = serde_json::from_str(r#"{"rule_type": 2, "criterion": 3, "threshold": 0.5}"#)
//!     .unwrap();
//! assert_eq!(rule, Rule::discard(SlotCriterion::Oldest, 0.5));
//! assert!(serde_json::from_str::<Rule>(r#"{"rule_type": 4, "criterion": 1}"#).is_err());
//! ```

use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use hanabi_engine::Action;

use crate::{
    belief::{BeliefError, BeliefEngine},
    mutation::MutationParams,
};

pub use self::{criterion::*, discard::*, hint::*, play::*};

mod criterion;
mod discard;
mod hint;
mod play;

/// The three rule kinds; discriminants are the checkpoint `rule_type` ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
pub enum RuleKind {
    #[display("play")]
    Play = 1,
    #[display("discard")]
    Discard = 2,
    #[display("hint")]
    Hint = 3,
}

impl Distribution<RuleKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RuleKind {
        match rng.random_range(0..3) {
            0 => RuleKind::Play,
            1 => RuleKind::Discard,
            _ => RuleKind::Hint,
        }
    }
}

impl RuleKind {
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(RuleKind::Play),
            2 => Some(RuleKind::Discard),
            3 => Some(RuleKind::Hint),
            _ => None,
        }
    }
}

/// A rule, checkpoint or config entry that cannot be decoded.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MalformedCheckpoint {
    #[display("unknown rule_type {rule_type}")]
    UnknownRuleType { rule_type: u8 },
    #[display("unknown criterion {criterion} for a {kind} rule")]
    UnknownCriterion { kind: RuleKind, criterion: u8 },
    #[display("{kind} rule has no threshold")]
    MissingThreshold { kind: RuleKind },
    #[display("{kind} rule threshold {threshold} is outside [0, 1]")]
    ThresholdOutOfRange { kind: RuleKind, threshold: f64 },
}

/// A single decision primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(try_from = "EncodedRule", into = "EncodedRule")]
pub enum Rule {
    Play(PlayRule),
    Discard(DiscardRule),
    Hint(HintRule),
}

impl Rule {
    #[must_use]
    pub fn play(criterion: SlotCriterion, threshold: f64) -> Self {
        Rule::Play(PlayRule::new(criterion, threshold))
    }

    #[must_use]
    pub fn discard(criterion: SlotCriterion, threshold: f64) -> Self {
        Rule::Discard(DiscardRule::new(criterion, threshold))
    }

    #[must_use]
    pub fn hint(criterion: HintCriterion) -> Self {
        Rule::Hint(HintRule::new(criterion))
    }

    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Play(_) => RuleKind::Play,
            Rule::Discard(_) => RuleKind::Discard,
            Rule::Hint(_) => RuleKind::Hint,
        }
    }

    /// Proposes an action, or `None` if the rule does not fire.
    ///
    /// The belief is only read. Randomness comes solely from `rng`, so equal
    /// rules given equal beliefs and equally seeded generators agree.
    pub fn apply<R>(&self, belief: &BeliefEngine, rng: &mut R) -> Result<Option<Action>, BeliefError>
    where
        R: Rng + ?Sized,
    {
        match self {
            Rule::Play(rule) => rule.apply(belief),
            Rule::Discard(rule) => rule.apply(belief, rng),
            Rule::Hint(rule) => rule.apply(belief, rng),
        }
    }

    pub fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Rule::Play(rule) => rule.mutate(params, rng),
            Rule::Discard(rule) => rule.mutate(params, rng),
            Rule::Hint(rule) => rule.mutate(params, rng),
        }
    }

    /// Creates a uniformly parameterized rule of the given kind.
    pub fn random_of_kind<R>(kind: RuleKind, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match kind {
            RuleKind::Play => Rule::Play(PlayRule::random(rng)),
            RuleKind::Discard => Rule::Discard(DiscardRule::random(rng)),
            RuleKind::Hint => Rule::Hint(HintRule::random(rng)),
        }
    }

    /// Creates a rule of a uniformly random kind.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let kind = rng.random();
        Self::random_of_kind(kind, rng)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Play(rule) => write!(f, "play({}, >= {:.2})", rule.criterion, rule.threshold),
            Rule::Discard(rule) => {
                write!(f, "discard({}, >= {:.2})", rule.criterion, rule.threshold)
            }
            Rule::Hint(rule) => write!(f, "hint({})", rule.criterion),
        }
    }
}

/// Wire form of a rule inside a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EncodedRule {
    rule_type: u8,
    criterion: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
}

impl From<Rule> for EncodedRule {
    fn from(rule: Rule) -> Self {
        let rule_type = rule.kind().id();
        let (criterion, threshold) = match rule {
            Rule::Play(PlayRule {
                criterion,
                threshold,
            })
            | Rule::Discard(DiscardRule {
                criterion,
                threshold,
            }) => (criterion.id(), Some(threshold)),
            Rule::Hint(HintRule { criterion }) => (criterion.id(), None),
        };
        Self {
            rule_type,
            criterion,
            threshold,
        }
    }
}

impl TryFrom<EncodedRule> for Rule {
    type Error = MalformedCheckpoint;

    fn try_from(encoded: EncodedRule) -> Result<Self, Self::Error> {
        let kind = RuleKind::from_id(encoded.rule_type).ok_or(
            MalformedCheckpoint::UnknownRuleType {
                rule_type: encoded.rule_type,
            },
        )?;
        let unknown_criterion = MalformedCheckpoint::UnknownCriterion {
            kind,
            criterion: encoded.criterion,
        };
        let threshold = || -> Result<f64, MalformedCheckpoint> {
            let threshold = encoded
                .threshold
                .ok_or(MalformedCheckpoint::MissingThreshold { kind })?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(MalformedCheckpoint::ThresholdOutOfRange { kind, threshold });
            }
            Ok(threshold)
        };
        let rule = match kind {
            RuleKind::Play => {
                let criterion =
                    SlotCriterion::from_id(encoded.criterion).ok_or(unknown_criterion)?;
                Rule::Play(PlayRule {
                    criterion,
                    threshold: threshold()?,
                })
            }
            RuleKind::Discard => {
                let criterion =
                    SlotCriterion::from_id(encoded.criterion).ok_or(unknown_criterion)?;
                Rule::Discard(DiscardRule {
                    criterion,
                    threshold: threshold()?,
                })
            }
            RuleKind::Hint => {
                let criterion =
                    HintCriterion::from_id(encoded.criterion).ok_or(unknown_criterion)?;
                Rule::Hint(HintRule { criterion })
            }
        };
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use hanabi_engine::{CardType, Clue, Color, GameSnapshot, Hint, PlayerHand};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn belief() -> BeliefEngine {
        let mut snapshot = GameSnapshot {
            players: vec![PlayerHand::new(
                "bob",
                vec![
                    CardType::new(Color::Red, 1),
                    CardType::new(Color::White, 2),
                    CardType::new(Color::Blue, 5),
                ],
            )],
            hint_tokens: 5,
            hand_size: 5,
            ..GameSnapshot::default()
        };
        snapshot.stacks[Color::White.as_usize()] = vec![CardType::new(Color::White, 1)];
        let mut belief = BeliefEngine::new("alice");
        belief.update_game_state(snapshot).unwrap();
        belief
            .record_hint(&Hint {
                source: "bob".to_owned(),
                destination: "alice".to_owned(),
                clue: Clue::Value(1),
                positions: vec![0, 2],
            })
            .unwrap();
        belief
    }

    #[test]
    fn test_serialization_format() {
        let play = serde_json::to_value(Rule::play(SlotCriterion::LastHinted, 0.25)).unwrap();
        assert_eq!(
            play,
            serde_json::json!({"rule_type": 1, "criterion": 1, "threshold": 0.25})
        );
        let discard = serde_json::to_value(Rule::discard(SlotCriterion::All, 0.5)).unwrap();
        assert_eq!(
            discard,
            serde_json::json!({"rule_type": 2, "criterion": 6, "threshold": 0.5})
        );
        let hint = serde_json::to_value(Rule::hint(HintCriterion::Necessary)).unwrap();
        assert_eq!(hint, serde_json::json!({"rule_type": 3, "criterion": 4}));
    }

    #[test]
    fn test_round_trip_preserves_behavior() {
        let belief = belief();
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        for _ in 0..200 {
            let rule = Rule::random(&mut rng);
            let encoded = serde_json::to_string(&rule).unwrap();
            let decoded: Rule = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, rule);

            let seed = rng.random();
            let original = rule.apply(&belief, &mut Pcg64Mcg::seed_from_u64(seed));
            let restored = decoded.apply(&belief, &mut Pcg64Mcg::seed_from_u64(seed));
            assert_eq!(original, restored, "{rule}");
        }
    }

    #[test]
    fn test_fractional_thresholds_reload_exactly() {
        // Playabilities are ratios of small card counts, so a threshold sitting
        // exactly on one must not drift by an ulp.
        for n in 1..50_u32 {
            for k in 0..=n {
                let threshold = f64::from(k) / f64::from(n);
                let rule = Rule::play(SlotCriterion::Oldest, threshold);
                let decoded: Rule =
                    serde_json::from_str(&serde_json::to_string(&rule).unwrap()).unwrap();
                assert_eq!(decoded, rule, "{k}/{n}");
            }
        }
    }

    #[test]
    fn test_malformed_rules_are_rejected() {
        let cases = [
            r#"{"rule_type": 0, "criterion": 1, "threshold": 0.5}"#,
            r#"{"rule_type": 4, "criterion": 1}"#,
            r#"{"rule_type": 1, "criterion": 7, "threshold": 0.5}"#,
            r#"{"rule_type": 2, "criterion": 0, "threshold": 0.5}"#,
            r#"{"rule_type": 3, "criterion": 6}"#,
            r#"{"rule_type": 1, "criterion": 1}"#,
            r#"{"rule_type": 2, "criterion": 1, "threshold": 1.5}"#,
            r#"{"rule_type": 1, "criterion": -1, "threshold": 0.5}"#,
        ];
        for case in cases {
            assert!(serde_json::from_str::<Rule>(case).is_err(), "{case}");
        }
    }

    #[test]
    fn test_try_from_reports_cause() {
        let encoded = EncodedRule {
            rule_type: 3,
            criterion: 9,
            threshold: None,
        };
        assert_eq!(
            Rule::try_from(encoded).unwrap_err(),
            MalformedCheckpoint::UnknownCriterion {
                kind: RuleKind::Hint,
                criterion: 9
            }
        );
    }

    #[test]
    fn test_random_rules_cover_all_kinds() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let mut kinds = std::collections::HashSet::new();
        for _ in 0..100 {
            kinds.insert(Rule::random(&mut rng).kind());
        }
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Rule::play(SlotCriterion::LastHinted, 0.6).to_string(),
            "play(last-hinted, >= 0.60)"
        );
        assert_eq!(
            Rule::hint(HintCriterion::Playable).to_string(),
            "hint(playable)"
        );
    }
}
