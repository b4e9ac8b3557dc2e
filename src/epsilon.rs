//! Epsilon-greedy over plain running means.
//!
//! A fixed fraction `epsilon` of selections explore uniformly at random; every other
//! selection exploits the arm with the highest running mean. Each arm's mean starts
//! from one optimistic pseudo-observation of `1.0`, which seeds early exploration and
//! keeps the mean defined before the first reward arrives.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    BanditError, BanditPolicy, ConjugateModel, PosteriorSnapshot, Result, StreamingSummarizer,
};

/// Value of the optimistic pseudo-observation each arm starts with.
pub const OPTIMISTIC_INIT: f64 = 1.0;

/// Seedable epsilon-greedy bandit.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    summaries: Vec<StreamingSummarizer>,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// `k >= 1` arms, `epsilon` in `[0, 1]`.
    pub fn new(k: usize, epsilon: f64, seed: u64) -> Result<Self> {
        if k == 0 {
            return Err(BanditError::invalid_argument(
                "epsilon-greedy needs at least one arm",
            ));
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::invalid_argument(format!(
                "epsilon must be in [0, 1], got {epsilon}"
            )));
        }
        let summaries = (0..k)
            .map(|_| {
                let mut s = StreamingSummarizer::new();
                s.add(OPTIMISTIC_INIT);
                s
            })
            .collect();
        Ok(Self {
            epsilon,
            summaries,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Arm with the highest running mean; lowest index on ties.
    pub fn greedy_arm(&self) -> usize {
        let mut best = 0;
        let mut best_mean = self.summaries[0].mean();
        for (i, s) in self.summaries.iter().enumerate().skip(1) {
            if s.mean() > best_mean {
                best_mean = s.mean();
                best = i;
            }
        }
        best
    }

    fn check_arm(&self, arm: usize) -> Result<()> {
        if arm >= self.summaries.len() {
            return Err(BanditError::invalid_argument(format!(
                "arm {arm} out of range for {} arms",
                self.summaries.len()
            )));
        }
        Ok(())
    }
}

impl BanditPolicy for EpsilonGreedy {
    fn arm_count(&self) -> usize {
        self.summaries.len()
    }

    fn select(&mut self) -> usize {
        if self.rng.random::<f64>() < self.epsilon {
            self.rng.random_range(0..self.summaries.len())
        } else {
            self.greedy_arm()
        }
    }

    fn train(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.check_arm(arm)?;
        if !reward.is_finite() {
            return Err(BanditError::InvalidObservation {
                family: "epsilon-greedy",
                value: reward,
            });
        }
        self.summaries[arm].add(reward);
        Ok(())
    }

    /// Arms by running mean, best first; ties keep index order.
    fn rank(&mut self, top_n: usize) -> Result<Vec<usize>> {
        if top_n > self.summaries.len() {
            return Err(BanditError::invalid_argument(format!(
                "top_n {top_n} exceeds {} arms",
                self.summaries.len()
            )));
        }
        let mut order: Vec<usize> = (0..self.summaries.len()).collect();
        order.sort_by(|&a, &b| {
            self.summaries[b]
                .mean()
                .total_cmp(&self.summaries[a].mean())
        });
        order.truncate(top_n);
        Ok(order)
    }

    fn mean_of(&self, arm: usize) -> Result<f64> {
        self.check_arm(arm)?;
        Ok(self.summaries[arm].mean())
    }

    fn sample_counts(&self) -> Vec<f64> {
        self.summaries.iter().map(|s| s.count() as f64).collect()
    }

    fn posteriors(&self) -> Result<Vec<PosteriorSnapshot>> {
        Err(BanditError::UnsupportedOperation(
            "epsilon-greedy keeps running means, not posteriors",
        ))
    }

    fn add_arm(&mut self, _model: ConjugateModel) -> Result<usize> {
        Err(BanditError::UnsupportedOperation(
            "can't add a posterior model to epsilon-greedy",
        ))
    }
}
