//! Beta-Binomial conjugate model.
//!
//! Rewards are Bernoulli with an unknown success probability `pi`:
//!
//! ```text
//!   pi ~ Beta(alpha, beta)
//!   x  ~ Bernoulli(pi)
//! ```
//!
//! Observing a success bumps `alpha`, a failure bumps `beta`. `sample_mean` draws a
//! fresh `pi` (the Thompson-sampling signal); `sample_observation` draws a 0/1 reward.

use rand::Rng;
use rand_distr::{Distribution, Gamma};

use crate::{BanditError, BayesianDistribution, PosteriorSnapshot, Result};

/// Draw one sample from `Beta(alpha, beta)`.
///
/// Uses the two-Gamma construction `u / (u + v)` with `u ~ Gamma(alpha, 1)` and
/// `v ~ Gamma(beta, 1)`, which is exact and needs no rejection step.
/// Non-positive or non-finite parameters fall back to `0.5`.
pub fn sample_beta<R: Rng + ?Sized>(alpha: f64, beta: f64, rng: &mut R) -> f64 {
    if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || beta <= 0.0 {
        return 0.5;
    }
    let (Ok(ga), Ok(gb)) = (Gamma::new(alpha, 1.0), Gamma::new(beta, 1.0)) else {
        return 0.5;
    };
    let u: f64 = ga.sample(rng);
    let v: f64 = gb.sample(rng);
    let s = u + v;
    if s > 0.0 && s.is_finite() {
        u / s
    } else {
        // Both draws underflowed (tiny shapes); the mean is the only sane answer.
        alpha / (alpha + beta)
    }
}

/// Beta posterior over a Bernoulli success probability.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetaBinomial {
    alpha: f64,
    beta: f64,
}

impl BetaBinomial {
    /// Create a model with prior pseudo-counts `(alpha, beta)`, both finite and > 0.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || beta <= 0.0 {
            return Err(BanditError::invalid_argument(format!(
                "beta-binomial prior must be positive, got alpha={alpha} beta={beta}"
            )));
        }
        Ok(Self { alpha, beta })
    }

    /// Uniform prior, `Beta(1, 1)`.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Default for BetaBinomial {
    fn default() -> Self {
        Self::uniform()
    }
}

impl BayesianDistribution for BetaBinomial {
    fn sample_observation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let pi = sample_beta(self.alpha, self.beta, rng);
        if rng.random::<f64>() < pi {
            1.0
        } else {
            0.0
        }
    }

    fn sample_mean<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_beta(self.alpha, self.beta, rng)
    }

    fn observe(&mut self, x: f64) -> Result<()> {
        if x == 1.0 {
            self.alpha += 1.0;
        } else if x == 0.0 {
            self.beta += 1.0;
        } else {
            return Err(BanditError::InvalidObservation {
                family: "beta-binomial",
                value: x,
            });
        }
        Ok(())
    }

    fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    fn sample_count(&self) -> f64 {
        self.alpha + self.beta
    }

    fn posterior(&self) -> PosteriorSnapshot {
        PosteriorSnapshot::Beta {
            alpha: self.alpha,
            beta: self.beta,
        }
    }

    fn predictive(&self) -> PosteriorSnapshot {
        PosteriorSnapshot::Bernoulli { p: self.mean() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mean_is_alpha_over_total() {
        assert!((BetaBinomial::new(1.0, 1.0).unwrap().mean() - 0.5).abs() < 1e-12);
        assert!((BetaBinomial::new(2.0, 3.0).unwrap().mean() - 0.4).abs() < 1e-12);
        assert!((BetaBinomial::new(0.6, 10.0).unwrap().mean() - 0.6 / 10.6).abs() < 1e-12);
    }

    #[test]
    fn observe_success_bumps_alpha_only() {
        let mut m = BetaBinomial::new(2.0, 3.0).unwrap();
        m.observe(1.0).unwrap();
        assert_eq!(m.alpha(), 3.0);
        assert_eq!(m.beta(), 3.0);
        m.observe(0.0).unwrap();
        assert_eq!(m.alpha(), 3.0);
        assert_eq!(m.beta(), 4.0);
        assert_eq!(m.sample_count(), 7.0);
    }

    #[test]
    fn observe_rejects_non_binary_values() {
        let mut m = BetaBinomial::uniform();
        for x in [0.5, -1.0, 2.0, f64::NAN, f64::INFINITY] {
            let err = m.observe(x).unwrap_err();
            assert!(matches!(err, BanditError::InvalidObservation { .. }), "{x}");
        }
        // State is untouched by rejected observations.
        assert_eq!(m, BetaBinomial::uniform());
    }

    #[test]
    fn new_rejects_non_positive_priors() {
        assert!(BetaBinomial::new(0.0, 1.0).is_err());
        assert!(BetaBinomial::new(1.0, -2.0).is_err());
        assert!(BetaBinomial::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn samples_stay_in_support() {
        let m = BetaBinomial::new(0.6, 20.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let p = m.sample_mean(&mut rng);
            assert!((0.0..=1.0).contains(&p));
            let x = m.sample_observation(&mut rng);
            assert!(x == 0.0 || x == 1.0);
        }
    }

    #[test]
    fn sample_beta_falls_back_on_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sample_beta(0.0, 1.0, &mut rng), 0.5);
        assert_eq!(sample_beta(1.0, f64::NAN, &mut rng), 0.5);
    }

    #[test]
    fn observation_rate_tracks_posterior_mean() {
        let m = BetaBinomial::new(30.0, 10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let hits: f64 = (0..n).map(|_| m.sample_observation(&mut rng)).sum();
        assert!((hits / n as f64 - 0.75).abs() < 0.02);
    }
}
