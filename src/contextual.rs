//! Contextual Beta bandit over a fixed feature map.
//!
//! Each arm is described by a row of `m` feature weights. The bandit keeps one
//! `Beta(alpha_j, beta_j)` belief per feature instead of per arm, so evidence about one
//! arm transfers to every arm that shares its features.
//!
//! ## Sampling
//!
//! 1. Draw `p_j ~ Beta(alpha_j, beta_j)` for every feature and map it to log-odds,
//!    `theta_j = ln(p_j / (1 - p_j))`.
//! 2. Score each arm as `feature_map[arm] · theta`.
//! 3. Pick the arm with the largest score (lowest index on ties).
//!
//! [`sample_probabilities`](ContextualBayesBandit::sample_probabilities) returns the
//! logistic of the same scores.
//!
//! ## Training
//!
//! A success adds `feature_map[arm] / m` to the alpha column; a failure adds it to
//! the beta column. Weights are expected to be non-negative.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::beta::sample_beta;
use crate::{BanditError, Result};

/// Keeps log-odds finite when a Beta draw lands on 0 or 1.
const P_CLAMP: f64 = 1e-12;

fn logit(p: f64) -> f64 {
    let p = p.clamp(P_CLAMP, 1.0 - P_CLAMP);
    (p / (1.0 - p)).ln()
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Seedable contextual Thompson sampler with per-feature Beta beliefs.
#[derive(Debug, Clone)]
pub struct ContextualBayesBandit {
    // k x m, row-major.
    feature_map: Vec<f64>,
    arms: usize,
    features: usize,
    // (alpha, beta) per feature.
    state: Vec<(f64, f64)>,
    rng: StdRng,
}

impl ContextualBayesBandit {
    /// Uniform `Beta(1, 1)` prior on every feature.
    pub fn new(feature_map: Vec<Vec<f64>>, seed: u64) -> Result<Self> {
        Self::with_prior(feature_map, 1.0, 1.0, seed)
    }

    /// `feature_map` has one row per arm; every row must have the same non-zero
    /// length and only finite, non-negative weights.
    pub fn with_prior(feature_map: Vec<Vec<f64>>, alpha0: f64, beta0: f64, seed: u64) -> Result<Self> {
        if !(alpha0.is_finite() && beta0.is_finite() && alpha0 > 0.0 && beta0 > 0.0) {
            return Err(BanditError::invalid_argument(format!(
                "feature prior must be positive, got alpha={alpha0} beta={beta0}"
            )));
        }
        let arms = feature_map.len();
        let features = feature_map.first().map_or(0, Vec::len);
        if arms == 0 || features == 0 {
            return Err(BanditError::invalid_argument(
                "feature map needs at least one arm and one feature",
            ));
        }
        let mut flat = Vec::with_capacity(arms * features);
        for (i, row) in feature_map.iter().enumerate() {
            if row.len() != features {
                return Err(BanditError::invalid_argument(format!(
                    "feature row {i} has {} columns, expected {features}",
                    row.len()
                )));
            }
            if row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(BanditError::invalid_argument(format!(
                    "feature row {i} has a negative or non-finite weight"
                )));
            }
            flat.extend_from_slice(row);
        }
        Ok(Self {
            feature_map: flat,
            arms,
            features,
            state: vec![(alpha0, beta0); features],
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn arm_count(&self) -> usize {
        self.arms
    }

    pub fn feature_count(&self) -> usize {
        self.features
    }

    /// Current `(alpha, beta)` per feature.
    pub fn feature_state(&self) -> &[(f64, f64)] {
        &self.state
    }

    fn row(&self, arm: usize) -> &[f64] {
        &self.feature_map[arm * self.features..(arm + 1) * self.features]
    }

    /// Linear scores `feature_map · theta` for one draw of theta.
    fn sample_scores(&mut self) -> Vec<f64> {
        let rng = &mut self.rng;
        let theta: Vec<f64> = self
            .state
            .iter()
            .map(|&(a, b)| logit(sample_beta(a, b, rng)))
            .collect();
        (0..self.arms)
            .map(|arm| self.row(arm).iter().zip(&theta).map(|(w, t)| w * t).sum())
            .collect()
    }

    /// Choose an arm.
    pub fn sample(&mut self) -> usize {
        let scores = self.sample_scores();
        let mut best = 0;
        for (i, s) in scores.iter().enumerate().skip(1) {
            if *s > scores[best] {
                best = i;
            }
        }
        best
    }

    /// Logistic of one draw of the arm scores.
    pub fn sample_probabilities(&mut self) -> Vec<f64> {
        self.sample_scores().into_iter().map(logistic).collect()
    }

    pub fn train(&mut self, arm: usize, success: bool) -> Result<()> {
        if arm >= self.arms {
            return Err(BanditError::invalid_argument(format!(
                "arm {arm} out of range for {} arms",
                self.arms
            )));
        }
        let scale = 1.0 / self.features as f64;
        let start = arm * self.features;
        for (j, s) in self.state.iter_mut().enumerate() {
            let w = self.feature_map[start + j] * scale;
            if success {
                s.0 += w;
            } else {
                s.1 += w;
            }
        }
        Ok(())
    }
}
