use rand::Rng;

use hanabi_engine::{Action, GameEvent};

use crate::{
    belief::{BeliefEngine, BeliefError},
    policy::{DecisionError, Policy},
};

/// A policy seated at a table, tracking what it has learned so far.
///
/// The player's in-game name is the policy's name.
#[derive(Debug, Clone)]
pub struct Player {
    policy: Policy,
    belief: BeliefEngine,
    final_score: Option<i32>,
}

impl Player {
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        let belief = BeliefEngine::new(policy.name.clone());
        Self {
            policy,
            belief,
            final_score: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.policy.name
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[must_use]
    pub fn belief(&self) -> &BeliefEngine {
        &self.belief
    }

    /// The team score, once the game is over.
    #[must_use]
    pub fn final_score(&self) -> Option<i32> {
        self.final_score
    }

    /// Folds one game event into the player's belief.
    ///
    /// Cards leaving other players' hands are already reflected by the next
    /// snapshot, so only this player's own removals touch its hand belief.
    pub fn handle(&mut self, event: &GameEvent) -> Result<(), BeliefError> {
        match event {
            GameEvent::StateUpdated(snapshot) => self.belief.update_game_state(snapshot.clone()),
            GameEvent::HintGiven(hint) => self.belief.record_hint(hint),
            GameEvent::CardPlayed { .. }
            | GameEvent::CardDiscarded { .. }
            | GameEvent::CardMisplayed { .. } => match event.removed_card() {
                Some((player, index)) if player == self.name() => {
                    self.belief.record_card_played(index)
                }
                _ => Ok(()),
            },
            GameEvent::GameOver { score } => {
                tracing::debug!(player = %self.policy.name, score, "game over");
                self.final_score = Some(*score);
                Ok(())
            }
        }
    }

    pub fn choose_action<R>(&self, rng: &mut R) -> Result<Action, DecisionError>
    where
        R: Rng + ?Sized,
    {
        self.policy.choose_action(&self.belief, rng)
    }
}
