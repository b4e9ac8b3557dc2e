//! The posterior-updatable reward distribution contract and its closed set of models.
//!
//! Every arm of a Bayesian policy owns one [`ConjugateModel`]. A model is a two-level
//! distribution: a posterior over the latent mean, and a predictive distribution over
//! the next observed reward. Sampling takes the random source explicitly, so a model
//! never carries hidden generator state and two arms never share one.

use rand::Rng;
use rand_distr::StandardNormal;
use statrs::distribution::{Continuous, ContinuousCDF};

use crate::beta::sample_beta;
use crate::{BetaBinomial, NormalGamma, Result};

/// Sufficient statistics for a one-armed reward process, updatable one observation
/// at a time.
pub trait BayesianDistribution {
    /// Draw one simulated reward from the posterior-predictive distribution.
    fn sample_observation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    /// Draw one sample of the latent mean from the posterior. This is the value
    /// Thompson sampling compares across arms.
    fn sample_mean<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    /// Incorporate one realized reward.
    ///
    /// Fails with [`BanditError::InvalidObservation`](crate::BanditError) if `x` is
    /// outside the family's support; the state is left unchanged in that case.
    fn observe(&mut self, x: f64) -> Result<()>;

    /// Posterior mean of the reward (a point estimate, not a sample).
    fn mean(&self) -> f64;

    /// Total pseudo-observations incorporated, prior included.
    fn sample_count(&self) -> f64;

    /// Immutable snapshot of the current belief over the mean.
    fn posterior(&self) -> PosteriorSnapshot;

    /// Immutable snapshot of the current posterior-predictive distribution.
    fn predictive(&self) -> PosteriorSnapshot;
}

/// A detached copy of a distribution, safe to hand out for plotting or testing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum PosteriorSnapshot {
    Beta { alpha: f64, beta: f64 },
    Normal { mean: f64, sd: f64 },
    Bernoulli { p: f64 },
}

impl PosteriorSnapshot {
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Beta { alpha, beta } => alpha / (alpha + beta),
            Self::Normal { mean, .. } => mean,
            Self::Bernoulli { p } => p,
        }
    }

    /// Density (probability mass for `Bernoulli`). `NaN` if the parameters are degenerate.
    pub fn pdf(&self, x: f64) -> f64 {
        match *self {
            Self::Beta { alpha, beta } => statrs::distribution::Beta::new(alpha, beta)
                .map_or(f64::NAN, |d| d.pdf(x)),
            Self::Normal { mean, sd } => {
                statrs::distribution::Normal::new(mean, sd).map_or(f64::NAN, |d| d.pdf(x))
            }
            Self::Bernoulli { p } => {
                if x == 1.0 {
                    p
                } else if x == 0.0 {
                    1.0 - p
                } else {
                    0.0
                }
            }
        }
    }

    /// Cumulative distribution function. `NaN` if the parameters are degenerate.
    pub fn cdf(&self, x: f64) -> f64 {
        match *self {
            Self::Beta { alpha, beta } => statrs::distribution::Beta::new(alpha, beta)
                .map_or(f64::NAN, |d| d.cdf(x.clamp(0.0, 1.0))),
            Self::Normal { mean, sd } => {
                statrs::distribution::Normal::new(mean, sd).map_or(f64::NAN, |d| d.cdf(x))
            }
            Self::Bernoulli { p } => {
                if x < 0.0 {
                    0.0
                } else if x < 1.0 {
                    1.0 - p
                } else {
                    1.0
                }
            }
        }
    }

    /// Draw one value from the snapshot.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Beta { alpha, beta } => sample_beta(alpha, beta, rng),
            Self::Normal { mean, sd } => {
                let z: f64 = rng.sample(StandardNormal);
                mean + z * sd
            }
            Self::Bernoulli { p } => {
                if rng.random::<f64>() < p {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// One arm's posterior: the closed set of conjugate families.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConjugateModel {
    BetaBinomial(BetaBinomial),
    NormalGamma(NormalGamma),
}

impl From<BetaBinomial> for ConjugateModel {
    fn from(m: BetaBinomial) -> Self {
        Self::BetaBinomial(m)
    }
}

impl From<NormalGamma> for ConjugateModel {
    fn from(m: NormalGamma) -> Self {
        Self::NormalGamma(m)
    }
}

impl BayesianDistribution for ConjugateModel {
    fn sample_observation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::BetaBinomial(m) => m.sample_observation(rng),
            Self::NormalGamma(m) => m.sample_observation(rng),
        }
    }

    fn sample_mean<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::BetaBinomial(m) => m.sample_mean(rng),
            Self::NormalGamma(m) => m.sample_mean(rng),
        }
    }

    fn observe(&mut self, x: f64) -> Result<()> {
        match self {
            Self::BetaBinomial(m) => m.observe(x),
            Self::NormalGamma(m) => m.observe(x),
        }
    }

    fn mean(&self) -> f64 {
        match self {
            Self::BetaBinomial(m) => m.mean(),
            Self::NormalGamma(m) => m.mean(),
        }
    }

    fn sample_count(&self) -> f64 {
        match self {
            Self::BetaBinomial(m) => m.sample_count(),
            Self::NormalGamma(m) => m.sample_count(),
        }
    }

    fn posterior(&self) -> PosteriorSnapshot {
        match self {
            Self::BetaBinomial(m) => m.posterior(),
            Self::NormalGamma(m) => m.posterior(),
        }
    }

    fn predictive(&self) -> PosteriorSnapshot {
        match self {
            Self::BetaBinomial(m) => m.predictive(),
            Self::NormalGamma(m) => m.predictive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Draw `n` samples, sort them, and check the analytic CDF at each empirical
    /// quartile is within `eps` of `q / 4`.
    fn check_quartiles(snap: PosteriorSnapshot, draw: impl Fn(&mut StdRng) -> f64, eps: f64) {
        let n = 40_001;
        let mut rng = StdRng::seed_from_u64(17);
        let mut xs: Vec<f64> = (0..n).map(|_| draw(&mut rng)).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        for q in 0..=4 {
            let x = xs[(n - 1) * q / 4];
            let c = snap.cdf(x);
            assert!(
                (c - q as f64 / 4.0).abs() < eps,
                "{snap:?} q={q}: cdf({x})={c}"
            );
        }
    }

    #[test]
    fn beta_sample_mean_matches_analytic_quartiles() {
        for (a, b) in [(1.0, 1.0), (2.0, 3.0), (0.6, 20.0)] {
            let m = BetaBinomial::new(a, b).unwrap();
            check_quartiles(m.posterior(), |rng| m.sample_mean(rng), 1e-2);
        }
    }

    #[test]
    fn beta_snapshot_pdf_and_cdf_match_closed_forms() {
        let s = PosteriorSnapshot::Beta {
            alpha: 2.0,
            beta: 3.0,
        };
        // pdf = 12 x (1-x)^2, cdf = 6x^2 - 8x^3 + 3x^4
        for (x, pdf) in [(0.2, 1.536), (0.5, 1.5), (0.7, 0.756)] {
            assert!((s.pdf(x) - pdf).abs() < 1e-8, "pdf({x})");
        }
        for (x, cdf) in [(0.2, 0.1808), (0.5, 0.6875), (0.7, 0.9163)] {
            assert!((s.cdf(x) - cdf).abs() < 1e-8, "cdf({x})");
        }
        let u = PosteriorSnapshot::Beta {
            alpha: 1.0,
            beta: 1.0,
        };
        for x in [0.0, 0.1, 0.5, 1.0] {
            assert!((u.cdf(x) - x).abs() < 1e-10);
        }
    }

    #[test]
    fn bernoulli_snapshot_is_a_step_function() {
        let s = PosteriorSnapshot::Bernoulli { p: 0.3 };
        assert_eq!(s.cdf(-0.1), 0.0);
        assert!((s.cdf(0.5) - 0.7).abs() < 1e-12);
        assert_eq!(s.cdf(1.0), 1.0);
        assert!((s.pdf(1.0) - 0.3).abs() < 1e-12);
        assert_eq!(s.pdf(0.5), 0.0);
    }

    #[test]
    fn enum_dispatch_forwards_to_the_family() {
        let mut m: ConjugateModel = BetaBinomial::uniform().into();
        m.observe(1.0).unwrap();
        assert!((m.mean() - 2.0 / 3.0).abs() < 1e-12);
        assert!(m.observe(0.25).is_err());

        let mut g: ConjugateModel = NormalGamma::default().into();
        g.observe(0.25).unwrap();
        assert_eq!(g.sample_count(), 2.0);
        assert!(matches!(g.posterior(), PosteriorSnapshot::Normal { .. }));
    }

    #[test]
    fn snapshots_do_not_alias_live_state() {
        let mut m = BetaBinomial::uniform();
        let before = m.posterior();
        m.observe(1.0).unwrap();
        assert_eq!(
            before,
            PosteriorSnapshot::Beta {
                alpha: 1.0,
                beta: 1.0
            }
        );
        assert_ne!(before, m.posterior());
    }
}
