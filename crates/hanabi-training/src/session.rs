//! The game-session boundary and concurrent cohort evaluation.
//!
//! A [`GameSession`] seats one [`Player`] in a live game, feeds it events until
//! the game ends and returns the final team score. How it reaches the game
//! server is its own business; this crate only needs the score.
//!
//! [`evaluate_cohort`] runs one session per policy on scoped threads and
//! waits for all of them before returning. Policies evaluated together are
//! expected to join the same game, so they normally report the same score.

use std::thread;

use hanabi_evaluator::{agent::Player, policy::Policy};

use crate::EvolutionError;

/// A failure reported by a [`GameSession`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("game session for {player} failed: {message}")]
pub struct SessionError {
    pub player: String,
    pub message: String,
}

impl SessionError {
    #[must_use]
    pub fn new(player: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            message: message.into(),
        }
    }
}

/// Plays one game on behalf of a player.
///
/// Implementations are shared across the threads of one cohort, hence `Sync`.
/// There is no timeout at this layer; a session that never returns stalls the
/// epoch.
pub trait GameSession: Sync {
    fn play(&self, player: Player) -> Result<i32, SessionError>;
}

/// Plays one session per policy concurrently and returns the scores in input
/// order.
///
/// Blocks until every session has finished. The first failure in input order
/// is returned; a panicking session is reported as
/// [`EvolutionError::SessionPanicked`].
pub fn evaluate_cohort<S>(session: &S, policies: Vec<Policy>) -> Result<Vec<i32>, EvolutionError>
where
    S: GameSession + ?Sized,
{
    let names = policies
        .iter()
        .map(|policy| policy.name.clone())
        .collect::<Vec<_>>();
    let results = thread::scope(|s| {
        let handles = policies
            .into_iter()
            .map(|policy| s.spawn(move || session.play(Player::new(policy))))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(thread::ScopedJoinHandle::join)
            .collect::<Vec<_>>()
    });

    results
        .into_iter()
        .zip(names)
        .map(|(result, player)| match result {
            Ok(Ok(score)) => Ok(score),
            Ok(Err(source)) => Err(EvolutionError::Session { source }),
            Err(_) => Err(EvolutionError::SessionPanicked { player }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct ByRuleCount {
        calls: AtomicUsize,
    }

    impl GameSession for ByRuleCount {
        fn play(&self, player: Player) -> Result<i32, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(i32::try_from(player.policy().rules.len()).unwrap_or(i32::MAX))
        }
    }

    struct Failing;

    impl GameSession for Failing {
        fn play(&self, player: Player) -> Result<i32, SessionError> {
            match player.name() {
                "bad" => Err(SessionError::new("bad", "connection refused")),
                "panic" => panic!("session crashed"),
                _ => Ok(1),
            }
        }
    }

    fn policy(name: &str, rules: usize) -> Policy {
        let rule = hanabi_evaluator::rule::Rule::hint(hanabi_evaluator::rule::HintCriterion::Any);
        Policy::new(name, vec![rule; rules])
    }

    #[test]
    fn test_scores_in_input_order() {
        let session = ByRuleCount {
            calls: AtomicUsize::new(0),
        };
        let scores = evaluate_cohort(
            &session,
            vec![policy("a", 3), policy("b", 0), policy("c", 5), policy("d", 1)],
        )
        .unwrap();
        assert_eq!(scores, [3, 0, 5, 1]);
        assert_eq!(session.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_empty_cohort() {
        let session = ByRuleCount {
            calls: AtomicUsize::new(0),
        };
        assert_eq!(evaluate_cohort(&session, vec![]).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_session_error_propagates() {
        let err = evaluate_cohort(&Failing, vec![policy("ok", 1), policy("bad", 1)]).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Session { source } if source.player == "bad"
        ));
    }

    #[test]
    fn test_panic_is_reported() {
        let err = evaluate_cohort(&Failing, vec![policy("panic", 1), policy("ok", 1)]).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::SessionPanicked { player } if player == "panic"
        ));
    }
}
