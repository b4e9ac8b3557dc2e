//! Unified `BanditPolicy` trait and the closed set of policy variants.
//!
//! [`ThompsonSampling`] and [`EpsilonGreedy`] share the same interface:
//! `select() -> arm`, `train(arm, reward)` and `rank(top_n)`. The trait makes that
//! explicit; [`Policy`] wraps the fixed variant set so harness code can hold any
//! policy by value without boxing.
//!
//! Arms are plain indices `0..arm_count()`. The count only changes through
//! [`BanditPolicy::add_arm`], which epsilon-greedy refuses.

use crate::{
    BetaBinomial, ConjugateModel, EpsilonGreedy, NormalGamma, PosteriorSnapshot, Result,
    ThompsonSampling,
};

/// Common interface for stateful bandit policies.
///
/// # Example
///
/// ```rust
/// use banditry::{BanditPolicy, EpsilonGreedy, ThompsonSampling};
///
/// fn run_policy<P: BanditPolicy>(policy: &mut P, p: &[f64]) {
///     for t in 0..100 {
///         let arm = policy.select();
///         // ... observe the real outcome ...
///         let reward = if (t % 10) as f64 / 10.0 < p[arm] { 1.0 } else { 0.0 };
///         policy.train(arm, reward).unwrap();
///     }
/// }
///
/// let p = [0.2, 0.8];
/// let mut ts = ThompsonSampling::beta_binomial(2, 0).unwrap();
/// let mut eg = EpsilonGreedy::new(2, 0.1, 0).unwrap();
///
/// run_policy(&mut ts, &p);
/// run_policy(&mut eg, &p);
/// ```
pub trait BanditPolicy {
    /// Number of arms; fixed unless [`add_arm`](Self::add_arm) succeeds.
    fn arm_count(&self) -> usize;

    /// Choose the arm to play next.
    fn select(&mut self) -> usize;

    /// Feed back the reward observed for `arm`.
    fn train(&mut self, arm: usize, reward: f64) -> Result<()>;

    /// The `top_n` best-looking arms, best first, without duplicates.
    ///
    /// Fails with `InvalidArgument` if `top_n > arm_count()`.
    fn rank(&mut self, top_n: usize) -> Result<Vec<usize>>;

    /// Current point estimate of `arm`'s expected reward.
    fn mean_of(&self, arm: usize) -> Result<f64>;

    /// Per-arm observation counts (pseudo-observations included), in arm order.
    fn sample_counts(&self) -> Vec<f64>;

    /// Per-arm posterior snapshots, in arm order.
    fn posteriors(&self) -> Result<Vec<PosteriorSnapshot>>;

    /// Append an arm backed by `model`, returning its index.
    fn add_arm(&mut self, model: ConjugateModel) -> Result<usize>;
}

/// Policy family selector, as read from a scenario description.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PolicyKind {
    /// Thompson sampling over `Beta(alpha0, beta0)` priors.
    BetaBinomial { alpha0: f64, beta0: f64 },
    /// Thompson sampling over Normal-Gamma priors.
    NormalGamma { mean0: f64, count0: f64, sd0: f64 },
    /// Epsilon-greedy over running means.
    EpsilonGreedy { epsilon: f64 },
}

impl Default for PolicyKind {
    fn default() -> Self {
        Self::BetaBinomial {
            alpha0: 1.0,
            beta0: 1.0,
        }
    }
}

impl PolicyKind {
    /// Default Normal-Gamma prior (`m0 = 0`, `n0 = 1`, `sd0 = 1`).
    pub fn normal_gamma() -> Self {
        Self::NormalGamma {
            mean0: 0.0,
            count0: 1.0,
            sd0: 1.0,
        }
    }

    /// Uniform-random arm selection (epsilon-greedy with `epsilon = 1`).
    pub fn uniform_random() -> Self {
        Self::EpsilonGreedy { epsilon: 1.0 }
    }

    /// Build a fresh policy with `arms` arms and its own seeded generator.
    pub fn build(&self, arms: usize, seed: u64) -> Result<Policy> {
        Ok(match *self {
            Self::BetaBinomial { alpha0, beta0 } => Policy::Thompson(ThompsonSampling::with_prior(
                arms,
                BetaBinomial::new(alpha0, beta0)?,
                seed,
            )?),
            Self::NormalGamma { mean0, count0, sd0 } => {
                Policy::Thompson(ThompsonSampling::with_prior(
                    arms,
                    NormalGamma::new(mean0, count0, sd0)?,
                    seed,
                )?)
            }
            Self::EpsilonGreedy { epsilon } => {
                Policy::EpsilonGreedy(EpsilonGreedy::new(arms, epsilon, seed)?)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BetaBinomial { .. } => "beta-binomial",
            Self::NormalGamma { .. } => "normal-gamma",
            Self::EpsilonGreedy { .. } => "epsilon-greedy",
        }
    }
}

/// Any policy in the closed variant set.
#[derive(Debug, Clone)]
pub enum Policy {
    Thompson(ThompsonSampling),
    EpsilonGreedy(EpsilonGreedy),
}

impl BanditPolicy for Policy {
    fn arm_count(&self) -> usize {
        match self {
            Self::Thompson(p) => p.arm_count(),
            Self::EpsilonGreedy(p) => p.arm_count(),
        }
    }

    fn select(&mut self) -> usize {
        match self {
            Self::Thompson(p) => p.select(),
            Self::EpsilonGreedy(p) => p.select(),
        }
    }

    fn train(&mut self, arm: usize, reward: f64) -> Result<()> {
        match self {
            Self::Thompson(p) => p.train(arm, reward),
            Self::EpsilonGreedy(p) => p.train(arm, reward),
        }
    }

    fn rank(&mut self, top_n: usize) -> Result<Vec<usize>> {
        match self {
            Self::Thompson(p) => p.rank(top_n),
            Self::EpsilonGreedy(p) => p.rank(top_n),
        }
    }

    fn mean_of(&self, arm: usize) -> Result<f64> {
        match self {
            Self::Thompson(p) => p.mean_of(arm),
            Self::EpsilonGreedy(p) => p.mean_of(arm),
        }
    }

    fn sample_counts(&self) -> Vec<f64> {
        match self {
            Self::Thompson(p) => p.sample_counts(),
            Self::EpsilonGreedy(p) => p.sample_counts(),
        }
    }

    fn posteriors(&self) -> Result<Vec<PosteriorSnapshot>> {
        match self {
            Self::Thompson(p) => p.posteriors(),
            Self::EpsilonGreedy(p) => p.posteriors(),
        }
    }

    fn add_arm(&mut self, model: ConjugateModel) -> Result<usize> {
        match self {
            Self::Thompson(p) => p.add_arm(model),
            Self::EpsilonGreedy(p) => p.add_arm(model),
        }
    }
}
