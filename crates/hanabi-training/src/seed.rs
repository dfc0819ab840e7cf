use hanabi_evaluator::{
    policy::Policy,
    rule::{HintCriterion, Rule, SlotCriterion},
};

/// The hand-written policy every seeded population starts from.
///
/// Play anything that is almost surely playable, then anything just hinted
/// that is likely playable, then point out a playable card, then discard
/// something at least even odds useless.
#[must_use]
pub fn seed_policy(name: impl Into<String>) -> Policy {
    Policy::new(
        name,
        vec![
            Rule::play(SlotCriterion::All, 0.95),
            Rule::play(SlotCriterion::LastHinted, 0.6),
            Rule::hint(HintCriterion::Playable),
            Rule::discard(SlotCriterion::All, 0.5),
        ],
    )
}
