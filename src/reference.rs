//! Ground-truth reward distributions for simulation.
//!
//! A harness replication draws one [`RewardDistribution`] per arm from a
//! [`ReferenceGenerator`]. Each distribution knows its true mean, which is what regret
//! is measured against.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use statrs::distribution::Continuous;

use crate::beta::sample_beta;
use crate::{BanditError, Result};

/// A reward source with a known mean.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum RewardDistribution {
    /// 0/1 rewards with success probability `p`.
    Bernoulli { p: f64 },
    /// Gaussian rewards.
    Normal { mean: f64, sd: f64 },
}

impl RewardDistribution {
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Bernoulli { p } => p,
            Self::Normal { mean, .. } => mean,
        }
    }

    /// Reject parameters that cannot produce rewards: `p` outside `[0, 1]`, a
    /// non-finite mean, or a negative or non-finite spread.
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Bernoulli { p } => (0.0..=1.0).contains(&p),
            Self::Normal { mean, sd } => mean.is_finite() && sd.is_finite() && sd >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(BanditError::invalid_argument(format!(
                "invalid reference distribution {self:?}"
            )))
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Bernoulli { p } => {
                if rng.random::<f64>() < p {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Normal { mean, sd } => {
                let z: f64 = rng.sample(StandardNormal);
                mean + z * sd
            }
        }
    }
}

/// Reference-distribution generator selector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ReferenceKind {
    /// Bernoulli arms whose probabilities are drawn from `Beta(alpha, beta)`;
    /// `Beta(1, 1)` gives uniform probabilities.
    Bernoulli { alpha: f64, beta: f64 },
    /// Normal arms with mean uniform on `[0, 1)` and a fixed spread.
    Normal { sd: f64 },
    /// Bernoulli arms whose probabilities follow a Metropolis walk targeting
    /// `Beta(alpha, beta)`; successive draws are serially correlated.
    BetaWalk {
        alpha: f64,
        beta: f64,
        step_size: f64,
    },
}

impl Default for ReferenceKind {
    fn default() -> Self {
        Self::Bernoulli {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

/// Where a harness gets its per-replication reference distributions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceSource {
    /// Fresh draws from a generator for every replication.
    Generated(ReferenceKind),
    /// The same distributions in every replication.
    Fixed(Vec<RewardDistribution>),
}

impl From<ReferenceKind> for ReferenceSource {
    fn from(kind: ReferenceKind) -> Self {
        Self::Generated(kind)
    }
}

impl From<Vec<RewardDistribution>> for ReferenceSource {
    fn from(refs: Vec<RewardDistribution>) -> Self {
        Self::Fixed(refs)
    }
}

impl ReferenceSource {
    /// Two-point Bernoulli references, one per probability.
    pub fn bernoulli(probs: &[f64]) -> Self {
        Self::Fixed(
            probs
                .iter()
                .map(|&p| RewardDistribution::Bernoulli { p })
                .collect(),
        )
    }
}

/// Metropolis random walk over `(0, 1)` whose stationary distribution is `Beta(alpha, beta)`.
///
/// Proposals are Gaussian steps in log-odds space, so the walk can never leave the
/// unit interval in exact arithmetic; a proposal that saturates to 0 or 1 in floating
/// point is rejected. Acceptance uses the Beta density in probability space.
#[derive(Debug, Clone)]
pub struct BetaWalk {
    target: statrs::distribution::Beta,
    step_size: f64,
    x: f64,
    ln_pdf: f64,
}

impl BetaWalk {
    /// Start the walk from one exact `Beta(alpha, beta)` draw.
    pub fn new<R: Rng + ?Sized>(alpha: f64, beta: f64, step_size: f64, rng: &mut R) -> Result<Self> {
        let target = statrs::distribution::Beta::new(alpha, beta)
            .map_err(|e| BanditError::invalid_argument(format!("beta walk target: {e}")))?;
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(BanditError::invalid_argument(format!(
                "beta walk step size must be positive, got {step_size}"
            )));
        }
        let x = sample_beta(alpha, beta, rng).clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        let ln_pdf = target.ln_pdf(x);
        Ok(Self {
            target,
            step_size,
            x,
            ln_pdf,
        })
    }

    pub fn position(&self) -> f64 {
        self.x
    }

    /// Propose one step and accept or reject it; returns the (possibly unchanged) position.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        let logit = (self.x / (1.0 - self.x)).ln() + z * self.step_size;
        let x1 = 1.0 / (1.0 + (-logit).exp());
        if !(x1 > 0.0 && x1 < 1.0) {
            return self.x;
        }
        let ln_pdf1 = self.target.ln_pdf(x1);
        if !ln_pdf1.is_finite() {
            return self.x;
        }
        let accept = ln_pdf1 > self.ln_pdf || rng.random::<f64>().ln() < ln_pdf1 - self.ln_pdf;
        if accept {
            self.x = x1;
            self.ln_pdf = ln_pdf1;
        }
        self.x
    }
}

/// Stateful, seeded source of reference distributions.
#[derive(Debug, Clone)]
pub struct ReferenceGenerator {
    kind: ReferenceKind,
    walk: Option<BetaWalk>,
    rng: StdRng,
}

impl ReferenceGenerator {
    pub fn new(kind: ReferenceKind, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let walk = match kind {
            ReferenceKind::Bernoulli { alpha, beta } => {
                if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || beta <= 0.0 {
                    return Err(BanditError::invalid_argument(format!(
                        "reference probabilities need a positive Beta prior, got alpha={alpha} beta={beta}"
                    )));
                }
                None
            }
            ReferenceKind::Normal { sd } => {
                if !(sd.is_finite() && sd >= 0.0) {
                    return Err(BanditError::invalid_argument(format!(
                        "reference spread must be non-negative, got {sd}"
                    )));
                }
                None
            }
            ReferenceKind::BetaWalk {
                alpha,
                beta,
                step_size,
            } => Some(BetaWalk::new(alpha, beta, step_size, &mut rng)?),
        };
        Ok(Self { kind, walk, rng })
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn next_distribution(&mut self) -> RewardDistribution {
        match self.kind {
            ReferenceKind::Bernoulli { alpha, beta } => RewardDistribution::Bernoulli {
                p: sample_beta(alpha, beta, &mut self.rng),
            },
            ReferenceKind::Normal { sd } => RewardDistribution::Normal {
                mean: self.rng.random::<f64>(),
                sd,
            },
            ReferenceKind::BetaWalk { .. } => {
                let p = match self.walk.as_mut() {
                    Some(w) => w.step(&mut self.rng),
                    None => 0.5,
                };
                RewardDistribution::Bernoulli { p }
            }
        }
    }

    /// `k` fresh distributions sorted ascending by true mean (the last is optimal).
    pub fn sorted_references(&mut self, k: usize) -> Vec<RewardDistribution> {
        let mut refs: Vec<RewardDistribution> = (0..k).map(|_| self.next_distribution()).collect();
        refs.sort_by(|a, b| a.mean().total_cmp(&b.mean()));
        refs
    }
}
