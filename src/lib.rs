//! `banditry`: seedable Bayesian bandits and a regret-measurement harness.
//!
//! Designed for simulation studies of the multi-armed bandit problem: you have `k`
//! arms with unknown reward distributions, a policy picks one arm per round, observes
//! a reward, and updates its beliefs. The crate provides the policies, the
//! conjugate posterior models behind them, and Monte-Carlo drivers that measure how
//! much reward a policy gives up against the best arm.
//!
//! **Goals:**
//! - **Reproducible**: every stochastic component owns an explicitly seeded generator.
//!   Same seed + same rewards → same choices, with or without the `parallel` feature.
//! - **Exact updates**: posteriors are conjugate, so `observe` is O(1) and closed-form.
//! - **Closed variant set**: policies and models are enums behind small traits, so
//!   harness code holds any of them by value.
//!
//! **Posterior models** ([`BayesianDistribution`]):
//! - [`BetaBinomial`]: `Beta(alpha, beta)` belief over a success probability; observations
//!   must be exactly 0 or 1.
//! - [`NormalGamma`]: joint belief over the mean and precision of Gaussian rewards,
//!   updated with Welford's recurrence.
//! - [`PosteriorSnapshot`]: immutable copy of a posterior (or predictive) with
//!   `mean`/`pdf`/`cdf`/`sample`.
//!
//! **Policies** ([`BanditPolicy`]):
//! - [`ThompsonSampling`]: one posterior draw per arm, pick the max. Supports `rank`,
//!   posterior snapshots and adding arms.
//! - [`EpsilonGreedy`]: running means with one optimistic pseudo-observation per arm.
//! - [`PolicyKind`] / [`Policy`]: scenario-level selector and the closed enum it builds.
//! - (feature `contextual`) [`ContextualBayesBandit`]: per-feature Beta beliefs shared
//!   across arms through a fixed feature map.
//!
//! **Simulation drivers:**
//! - [`RegretHarness`]: replicated cumulative and instantaneous regret curves, with
//!   checkpoints from a [`CheckpointSchedule`].
//! - [`RankingStudy`]: Thompson sampling as a page ranker (precision and regret per trial).
//! - [`HorizonStudy`] / [`CommitStudy`]: win-rate shortfall by horizon and two-arm
//!   commitment rate.
//! - [`ReferenceGenerator`]: Bernoulli, Normal and Metropolis-walk ([`BetaWalk`])
//!   reference distributions.
//! - [`StreamingSummarizer`]: O(1) mean/variance and P² quartiles.
//!
//! **Non-goals:**
//! - No CLI, file output or plotting; drivers return rows and callers format them.
//! - No non-conjugate models and no adversarial (EXP3-style) policies.
//!
//! # Example
//!
//! ```rust
//! use banditry::{HarnessConfig, PolicyKind, ReferenceSource, RegretHarness};
//!
//! let config = HarnessConfig {
//!     arms: 2,
//!     max_steps: 200,
//!     replications: 20,
//!     seed: 7,
//!     ..Default::default()
//! };
//! let harness = RegretHarness::new(
//!     config,
//!     PolicyKind::default(),
//!     ReferenceSource::bernoulli(&[0.3, 0.7]),
//! )
//! .unwrap();
//! let report = harness.run().unwrap();
//! let regret = report.final_cumulative_mean().unwrap();
//! // Uniform random play would give up about 0.5 * 200 * 0.4 = 40.
//! assert!(regret >= 0.0 && regret < 40.0);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): run harness replications and ranking copies on `rayon`.
//! - `serde`: `Serialize`/`Deserialize` for configs, selectors, snapshots and rows.
//! - `contextual`: [`ContextualBayesBandit`].

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod seed;
pub use seed::*;

mod summary;
pub use summary::*;

mod posterior;
pub use posterior::*;

mod beta;
pub use beta::*;

mod normal_gamma;
pub use normal_gamma::*;

mod policy;
pub use policy::*;

mod thompson;
pub use thompson::*;

mod epsilon;
pub use epsilon::*;

#[cfg(feature = "contextual")]
mod contextual;
#[cfg(feature = "contextual")]
pub use contextual::*;

mod schedule;
pub use schedule::*;

mod reference;
pub use reference::*;

mod harness;
pub use harness::*;

mod ranking;
pub use ranking::*;

mod study;
pub use study::*;
