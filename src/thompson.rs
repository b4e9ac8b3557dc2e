//! Thompson sampling over per-arm conjugate posteriors.
//!
//! Each call to [`select`](BanditPolicy::select) draws one latent-mean sample per arm
//! and returns the arm with the largest draw. Arms that are clearly worse are still
//! chosen occasionally, but only while their posterior overlaps the leader's.
//!
//! Notes:
//! - This policy is **seedable**: it owns its generator, so two policies built with
//!   the same seed and fed the same rewards make the same choices.
//! - Arms are identified by index `0..k`; the index is stable for the policy's lifetime.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::{
    BanditError, BanditPolicy, BayesianDistribution, BetaBinomial, ConjugateModel, NormalGamma,
    PosteriorSnapshot, Result,
};

/// Seedable Thompson-sampling bandit.
#[derive(Debug, Clone)]
pub struct ThompsonSampling {
    arms: Vec<ConjugateModel>,
    rng: StdRng,
}

impl ThompsonSampling {
    /// Create a policy from explicit per-arm models (at least one).
    pub fn new(arms: Vec<ConjugateModel>, seed: u64) -> Result<Self> {
        if arms.is_empty() {
            return Err(BanditError::invalid_argument(
                "thompson sampling needs at least one arm",
            ));
        }
        Ok(Self {
            arms,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// `k` arms sharing one prior.
    pub fn with_prior(k: usize, prior: impl Into<ConjugateModel>, seed: u64) -> Result<Self> {
        Self::new(vec![prior.into(); k], seed)
    }

    /// `k` Beta-Binomial arms with a uniform `Beta(1, 1)` prior.
    pub fn beta_binomial(k: usize, seed: u64) -> Result<Self> {
        Self::with_prior(k, BetaBinomial::uniform(), seed)
    }

    /// `k` Normal-Gamma arms with the default prior (`m0 = 0`, `n0 = 1`, `sd0 = 1`).
    pub fn normal_gamma(k: usize, seed: u64) -> Result<Self> {
        Self::with_prior(k, NormalGamma::default(), seed)
    }

    /// Read-only access to one arm's live model.
    pub fn arm(&self, arm: usize) -> Option<&ConjugateModel> {
        self.arms.get(arm)
    }

    fn check_arm(&self, arm: usize) -> Result<()> {
        if arm >= self.arms.len() {
            return Err(BanditError::invalid_argument(format!(
                "arm {arm} out of range for {} arms",
                self.arms.len()
            )));
        }
        Ok(())
    }

    /// One simultaneous latent-mean draw for every arm.
    fn draw_means(&mut self) -> Vec<f64> {
        let rng = &mut self.rng;
        self.arms.iter().map(|a| a.sample_mean(rng)).collect()
    }
}

impl BanditPolicy for ThompsonSampling {
    fn arm_count(&self) -> usize {
        self.arms.len()
    }

    /// Sample each arm's posterior mean and choose the max.
    ///
    /// Tie-break: lowest index (the first arm to reach the maximum wins).
    fn select(&mut self) -> usize {
        let mut best = 0;
        let mut best_sample = f64::NEG_INFINITY;
        for (i, arm) in self.arms.iter().enumerate() {
            let x = arm.sample_mean(&mut self.rng);
            if x > best_sample {
                best_sample = x;
                best = i;
            }
        }
        best
    }

    fn train(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.check_arm(arm)?;
        self.arms[arm].observe(reward)
    }

    /// Order arms by one simultaneous set of posterior draws, best first.
    ///
    /// Equal draws keep index order, so the result never repeats or omits an arm.
    fn rank(&mut self, top_n: usize) -> Result<Vec<usize>> {
        if top_n > self.arms.len() {
            return Err(BanditError::invalid_argument(format!(
                "top_n {top_n} exceeds {} arms",
                self.arms.len()
            )));
        }
        let draws = self.draw_means();
        let mut order: Vec<usize> = (0..draws.len()).collect();
        order.sort_by(|&a, &b| draws[b].total_cmp(&draws[a]));
        order.truncate(top_n);
        Ok(order)
    }

    fn mean_of(&self, arm: usize) -> Result<f64> {
        self.check_arm(arm)?;
        Ok(self.arms[arm].mean())
    }

    fn sample_counts(&self) -> Vec<f64> {
        self.arms.iter().map(|a| a.sample_count()).collect()
    }

    fn posteriors(&self) -> Result<Vec<PosteriorSnapshot>> {
        Ok(self.arms.iter().map(|a| a.posterior()).collect())
    }

    fn add_arm(&mut self, model: ConjugateModel) -> Result<usize> {
        self.arms.push(model);
        let idx = self.arms.len() - 1;
        trace!(arm = idx, "added arm");
        Ok(idx)
    }
}
