//! Normal-Gamma conjugate model for real-valued rewards with unknown mean and variance.
//!
//! State is a running mean `m`, a running count `n` and a running sum of squared
//! deviations `ss`, all seeded by prior pseudo-observations and updated one value
//! at a time with Welford's recurrence.

use rand::Rng;
use rand_distr::{Distribution, Gamma, StandardNormal};

use crate::{BanditError, BayesianDistribution, PosteriorSnapshot, Result};

/// Normal-Gamma posterior over the mean of a Gaussian reward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalGamma {
    m: f64,
    n: f64,
    ss: f64,
}

impl NormalGamma {
    /// Create a model with prior mean `mean0` backed by `count0` pseudo-observations
    /// whose spread is `sd0` (so the initial sum of squares is `sd0^2`).
    pub fn new(mean0: f64, count0: f64, sd0: f64) -> Result<Self> {
        if !mean0.is_finite() {
            return Err(BanditError::invalid_argument(format!(
                "normal-gamma prior mean must be finite, got {mean0}"
            )));
        }
        if !(count0.is_finite() && count0 > 0.0) || !(sd0.is_finite() && sd0 > 0.0) {
            return Err(BanditError::invalid_argument(format!(
                "normal-gamma prior count and sd must be positive, got count0={count0} sd0={sd0}"
            )));
        }
        Ok(Self {
            m: mean0,
            n: count0,
            ss: sd0 * sd0,
        })
    }

    /// Running sum of squared deviations (prior pseudo-variance included).
    pub fn sum_squares(&self) -> f64 {
        self.ss
    }

    /// Draw a variance from the posterior: precision ~ Gamma(n/2, rate = ss/2).
    fn sample_variance<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let shape = self.n / 2.0;
        let rate = self.ss / 2.0;
        if !(shape > 0.0 && rate > 0.0) {
            return self.ss / self.n.max(1.0);
        }
        match Gamma::new(shape, 1.0 / rate) {
            Ok(g) => {
                let precision: f64 = g.sample(rng);
                if precision > 0.0 {
                    1.0 / precision
                } else {
                    f64::MAX
                }
            }
            Err(_) => self.ss / self.n,
        }
    }

    /// Draw one posterior standard deviation of the reward process.
    pub fn sample_sd<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample_variance(rng).sqrt()
    }
}

impl Default for NormalGamma {
    /// Prior `m0 = 0`, `n0 = 1`, `sd0 = 1`.
    fn default() -> Self {
        Self {
            m: 0.0,
            n: 1.0,
            ss: 1.0,
        }
    }
}

impl BayesianDistribution for NormalGamma {
    fn sample_observation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let variance = self.sample_variance(rng);
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);
        let mean = self.m + z1 * (variance / self.n).sqrt();
        mean + z2 * variance.sqrt()
    }

    fn sample_mean<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let sd = (self.sample_variance(rng) / self.n).sqrt();
        let z: f64 = rng.sample(StandardNormal);
        self.m + z * sd
    }

    fn observe(&mut self, x: f64) -> Result<()> {
        if !x.is_finite() {
            return Err(BanditError::InvalidObservation {
                family: "normal-gamma",
                value: x,
            });
        }
        self.n += 1.0;
        let delta = x - self.m;
        self.m += delta / self.n;
        self.ss += delta * (x - self.m);
        Ok(())
    }

    fn mean(&self) -> f64 {
        self.m
    }

    fn sample_count(&self) -> f64 {
        self.n
    }

    fn posterior(&self) -> PosteriorSnapshot {
        PosteriorSnapshot::Normal {
            mean: self.m,
            sd: (self.ss / self.n).sqrt() / self.n.sqrt(),
        }
    }

    fn predictive(&self) -> PosteriorSnapshot {
        PosteriorSnapshot::Normal {
            mean: self.m,
            sd: (self.ss / self.n).sqrt(),
        }
    }
}
