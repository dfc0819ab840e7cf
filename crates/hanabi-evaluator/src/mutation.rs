//! Mutation parameters shared by rules and policies.

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Probabilities and noise levels used when mutating rules and policies.
///
/// Every field falls back to its default when missing from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MutationParams {
    /// Standard deviation of the Gaussian noise added to rule thresholds.
    pub threshold_sigma: f64,
    /// Probability that a rule's criterion is replaced by a random one.
    pub criterion_swap_prob: f64,
    /// Probability that each rule is dropped from a policy.
    pub drop_rule_prob: f64,
    /// Probability that each adjacent pair of rules swaps priority.
    pub swap_rule_prob: f64,
    /// Probability that a fresh random rule is inserted into a policy.
    pub insert_rule_prob: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            threshold_sigma: 0.1,
            criterion_swap_prob: 0.05,
            drop_rule_prob: 0.01,
            swap_rule_prob: 0.1,
            insert_rule_prob: 0.1,
        }
    }
}

/// A mutation parameter outside its valid range.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("mutation parameter `{name}` must be {expected}, got {value}")]
pub struct InvalidMutationParam {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: f64,
}

impl MutationParams {
    /// Checks that probabilities lie in `[0, 1]` and sigma is non-negative.
    pub fn validate(&self) -> Result<(), InvalidMutationParam> {
        if !(self.threshold_sigma >= 0.0 && self.threshold_sigma.is_finite()) {
            return Err(InvalidMutationParam {
                name: "threshold_sigma",
                expected: "a finite non-negative number",
                value: self.threshold_sigma,
            });
        }
        let probabilities = [
            ("criterion_swap_prob", self.criterion_swap_prob),
            ("drop_rule_prob", self.drop_rule_prob),
            ("swap_rule_prob", self.swap_rule_prob),
            ("insert_rule_prob", self.insert_rule_prob),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(InvalidMutationParam {
                    name,
                    expected: "in [0, 1]",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Adds `N(0, sigma)` noise to a probability and clamps the result to `[0, 1]`.
pub(crate) fn perturb_probability<R>(value: f64, sigma: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    match Normal::new(0.0, sigma) {
        Ok(normal) => (value + rng.sample(normal)).clamp(0.0, 1.0),
        Err(_) => value,
    }
}

/// Returns `true` with probability `p` clamped to `[0, 1]`. NaN never fires.
pub(crate) fn chance<R>(p: f64, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    rng.random_bool(p)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_perturbed_probability_stays_in_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut p = 0.5;
        for _ in 0..1000 {
            p = perturb_probability(p, 0.8, &mut rng);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        assert_eq!(perturb_probability(0.25, 0.0, &mut rng), 0.25);
    }

    #[test]
    fn test_chance_never_fires_on_nan() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        assert!((0..100).all(|_| !chance(f64::NAN, &mut rng)));
        assert!((0..100).all(|_| chance(2.0, &mut rng)));
    }

    #[test]
    fn test_validate() {
        assert!(MutationParams::default().validate().is_ok());
        let params = MutationParams {
            swap_rule_prob: 1.5,
            ..MutationParams::default()
        };
        assert_eq!(params.validate().unwrap_err().name, "swap_rule_prob");
        let params = MutationParams {
            threshold_sigma: -0.1,
            ..MutationParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let params: MutationParams = serde_json::from_str(r#"{"drop_rule_prob": 0.5}"#).unwrap();
        assert_eq!(params.drop_rule_prob, 0.5);
        assert_eq!(params.threshold_sigma, 0.1);
    }
}
