//! Monte-Carlo regret measurement.
//!
//! A [`RegretHarness`] runs many independent replications of one scenario: a fresh
//! policy with `arms` arms plays `max_steps` rounds against reference distributions
//! whose true means are known. Each replication produces a trace; traces are folded
//! into per-step and per-checkpoint [`StreamingSummarizer`]s in replication order.
//!
//! ## Determinism
//!
//! Every replication draws from its own generators, seeded from
//! `(config.seed, stream label, replication index)`. Reference distributions are
//! drawn on the calling thread before each batch starts, and batch results are folded
//! in index order, so a run's output does not depend on the `parallel` feature or on
//! worker scheduling.
//!
//! ## Output
//!
//! - `cumulative`: running regret total at every checkpoint of a [`CheckpointSchedule`].
//! - `instantaneous`: per-step regret `best_mean - chosen_mean`, grouped into buckets of
//!   `bucket_size` steps.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::{
    stream_seed, BanditError, BanditPolicy, CheckpointSchedule, PolicyKind, ReferenceGenerator,
    ReferenceSource, Result, RewardDistribution, StreamingSummarizer,
};

/// Scenario sizing and output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarnessConfig {
    /// Number of arms per replication.
    pub arms: usize,
    /// Rounds per replication.
    pub max_steps: u64,
    /// Independent replications.
    pub replications: usize,
    /// Steps per instantaneous-regret bucket.
    pub bucket_size: u64,
    /// Track quartiles (P²) in addition to means.
    pub quartiles: bool,
    pub seed: u64,
    /// Replications per unit of work handed to the worker pool.
    pub batch_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            arms: 2,
            max_steps: 1_000,
            replications: 100,
            bucket_size: 1,
            quartiles: false,
            seed: 0,
            batch_size: 16,
        }
    }
}

/// One point of an aggregated regret series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegretRow {
    /// One-based step number.
    pub step: u64,
    /// Mean across replications (and across the bucket, for instantaneous rows).
    pub mean: f64,
    /// `[min, q1, median, q3, max]` when quartile tracking is on.
    pub quartiles: Option<[f64; 5]>,
}

/// Aggregated output of [`RegretHarness::run`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegretReport {
    pub replications: usize,
    /// Cumulative regret at each checkpoint, ascending by step.
    pub cumulative: Vec<RegretRow>,
    /// Instantaneous regret per bucket, ascending by step.
    pub instantaneous: Vec<RegretRow>,
}

impl RegretReport {
    /// Mean cumulative regret at the last checkpoint.
    ///
    /// Checkpoints follow the 1-2-5 spacing, so this is the final step only when
    /// `max_steps` falls on a checkpoint (e.g. 1003 steps report step 1000).
    pub fn final_cumulative_mean(&self) -> Option<f64> {
        self.cumulative.last().map(|r| r.mean)
    }

    /// Mean cumulative regret at exactly `step`, if it is a checkpoint.
    pub fn cumulative_at(&self, step: u64) -> Option<f64> {
        self.cumulative
            .binary_search_by_key(&step, |r| r.step)
            .ok()
            .map(|i| self.cumulative[i].mean)
    }
}

/// Per-replication raw output, folded on the calling thread.
#[derive(Debug)]
struct ReplicationTrace {
    checkpoints: Vec<f64>,
    instant: Vec<f64>,
}

/// Runs a scenario and aggregates regret across replications.
#[derive(Debug, Clone)]
pub struct RegretHarness {
    config: HarnessConfig,
    policy: PolicyKind,
    references: ReferenceSource,
}

impl RegretHarness {
    /// Validate the scenario. Fixed references are sorted ascending by mean, so the
    /// last arm is optimal.
    pub fn new(
        config: HarnessConfig,
        policy: PolicyKind,
        references: impl Into<ReferenceSource>,
    ) -> Result<Self> {
        if config.arms == 0 {
            return Err(BanditError::invalid_argument("arms must be positive"));
        }
        if config.max_steps == 0 {
            return Err(BanditError::invalid_argument("max_steps must be positive"));
        }
        if config.replications == 0 {
            return Err(BanditError::invalid_argument("replications must be positive"));
        }
        if config.bucket_size == 0 {
            return Err(BanditError::invalid_argument("bucket_size must be positive"));
        }
        if config.batch_size == 0 {
            return Err(BanditError::invalid_argument("batch_size must be positive"));
        }
        let mut references = references.into();
        match &mut references {
            ReferenceSource::Fixed(refs) => {
                if refs.len() != config.arms {
                    return Err(BanditError::invalid_argument(format!(
                        "{} fixed references for {} arms",
                        refs.len(),
                        config.arms
                    )));
                }
                for r in refs.iter() {
                    r.validate()?;
                }
                refs.sort_by(|a, b| a.mean().total_cmp(&b.mean()));
            }
            ReferenceSource::Generated(kind) => {
                // Surface bad generator parameters now rather than mid-run.
                ReferenceGenerator::new(*kind, 0)?;
            }
        }
        // Same for the policy prior.
        policy.build(config.arms, 0)?;
        Ok(Self {
            config,
            policy,
            references,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn run(&self) -> Result<RegretReport> {
        let cfg = &self.config;
        debug!(
            policy = self.policy.name(),
            arms = cfg.arms,
            max_steps = cfg.max_steps,
            replications = cfg.replications,
            seed = cfg.seed,
            "regret harness starting"
        );

        let steps = CheckpointSchedule::checkpoints(cfg.max_steps);
        let n_buckets = cfg.max_steps.div_ceil(cfg.bucket_size) as usize;
        let mut cumulative: Vec<StreamingSummarizer> =
            steps.iter().map(|_| self.summarizer()).collect();
        let mut instantaneous: Vec<StreamingSummarizer> =
            (0..n_buckets).map(|_| self.summarizer()).collect();

        let mut generator = match &self.references {
            ReferenceSource::Generated(kind) => Some(ReferenceGenerator::new(
                *kind,
                stream_seed(cfg.seed, "reference", 0),
            )?),
            ReferenceSource::Fixed(_) => None,
        };

        let mut start = 0;
        while start < cfg.replications {
            let end = (start + cfg.batch_size).min(cfg.replications);
            let batch: Vec<(u64, Vec<RewardDistribution>)> = (start..end)
                .map(|i| (i as u64, self.draw_references(generator.as_mut())))
                .collect();

            for t in self.run_batch(&batch)? {
                for (s, v) in cumulative.iter_mut().zip(&t.checkpoints) {
                    s.add(*v);
                }
                for (i, v) in t.instant.iter().enumerate() {
                    instantaneous[i / cfg.bucket_size as usize].add(*v);
                }
            }
            trace!(start, end, "replication batch folded");
            start = end;
        }

        let report = RegretReport {
            replications: cfg.replications,
            cumulative: steps
                .iter()
                .zip(&cumulative)
                .map(|(&step, s)| row(step, s))
                .collect(),
            instantaneous: instantaneous
                .iter()
                .enumerate()
                .map(|(b, s)| {
                    let step = ((b as u64 + 1) * cfg.bucket_size).min(cfg.max_steps);
                    row(step, s)
                })
                .collect(),
        };
        info!(
            policy = self.policy.name(),
            final_regret = report.final_cumulative_mean().unwrap_or(f64::NAN),
            "regret harness complete"
        );
        Ok(report)
    }

    fn summarizer(&self) -> StreamingSummarizer {
        if self.config.quartiles {
            StreamingSummarizer::with_quartiles()
        } else {
            StreamingSummarizer::new()
        }
    }

    fn draw_references(&self, generator: Option<&mut ReferenceGenerator>) -> Vec<RewardDistribution> {
        match (&self.references, generator) {
            (_, Some(g)) => g.sorted_references(self.config.arms),
            (ReferenceSource::Fixed(refs), None) => refs.clone(),
            (ReferenceSource::Generated(_), None) => Vec::new(),
        }
    }

    #[cfg(feature = "parallel")]
    fn run_batch(&self, batch: &[(u64, Vec<RewardDistribution>)]) -> Result<Vec<ReplicationTrace>> {
        use rayon::prelude::*;
        batch
            .par_iter()
            .map(|(i, refs)| self.run_replication(*i, refs))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_batch(&self, batch: &[(u64, Vec<RewardDistribution>)]) -> Result<Vec<ReplicationTrace>> {
        batch
            .iter()
            .map(|(i, refs)| self.run_replication(*i, refs))
            .collect()
    }

    fn run_replication(&self, index: u64, refs: &[RewardDistribution]) -> Result<ReplicationTrace> {
        let cfg = &self.config;
        let Some(best) = refs.last().map(|r| r.mean()) else {
            return Err(BanditError::invalid_argument("no reference distributions"));
        };
        let mut policy = self
            .policy
            .build(cfg.arms, stream_seed(cfg.seed, "policy", index))?;
        let mut rng = StdRng::seed_from_u64(stream_seed(cfg.seed, "reward", index));
        let mut schedule = CheckpointSchedule::new();

        let mut trace = ReplicationTrace {
            checkpoints: Vec::new(),
            instant: Vec::with_capacity(cfg.max_steps as usize),
        };
        let mut total = 0.0;
        for step in 0..cfg.max_steps {
            let choice = policy.select();
            let reward = refs[choice].sample(&mut rng);
            let regret = best - refs[choice].mean();
            total += regret;
            trace.instant.push(regret);
            policy.train(choice, reward)?;
            if schedule.advance(step) {
                trace.checkpoints.push(total);
            }
        }
        Ok(trace)
    }
}

fn row(step: u64, s: &StreamingSummarizer) -> RegretRow {
    RegretRow {
        step,
        mean: s.mean(),
        quartiles: s.quartiles(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceKind;

    fn small() -> HarnessConfig {
        HarnessConfig {
            arms: 3,
            max_steps: 120,
            replications: 10,
            batch_size: 4,
            seed: 11,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_non_positive_sizes() {
        for cfg in [
            HarnessConfig { arms: 0, ..small() },
            HarnessConfig { max_steps: 0, ..small() },
            HarnessConfig { replications: 0, ..small() },
            HarnessConfig { bucket_size: 0, ..small() },
            HarnessConfig { batch_size: 0, ..small() },
        ] {
            let err = RegretHarness::new(cfg, PolicyKind::default(), ReferenceKind::default())
                .unwrap_err();
            assert!(matches!(err, BanditError::InvalidArgument(_)));
        }
    }

    #[test]
    fn fixed_references_must_match_arm_count() {
        let r = RegretHarness::new(
            small(),
            PolicyKind::default(),
            ReferenceSource::bernoulli(&[0.1, 0.2]),
        );
        assert!(r.is_err());
    }

    #[test]
    fn fixed_references_must_have_valid_parameters() {
        let two = HarnessConfig { arms: 2, ..small() };
        for refs in [
            ReferenceSource::bernoulli(&[0.3, f64::NAN]),
            ReferenceSource::bernoulli(&[0.3, 1.7]),
            ReferenceSource::Fixed(vec![
                RewardDistribution::Normal { mean: 0.0, sd: 1.0 },
                RewardDistribution::Normal { mean: 1.0, sd: -0.5 },
            ]),
        ] {
            let err = RegretHarness::new(two, PolicyKind::normal_gamma(), refs).unwrap_err();
            assert!(matches!(err, BanditError::InvalidArgument(_)));
        }
    }

    #[test]
    fn last_checkpoint_can_precede_max_steps() {
        let cfg = HarnessConfig {
            max_steps: 1_003,
            replications: 2,
            ..small()
        };
        let rep = RegretHarness::new(cfg, PolicyKind::default(), ReferenceKind::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(rep.cumulative.last().unwrap().step, 1_000);
        assert_eq!(rep.final_cumulative_mean(), rep.cumulative_at(1_000));
        assert_eq!(rep.instantaneous.last().unwrap().step, 1_003);
    }

    #[test]
    fn report_shape_follows_schedule_and_buckets() {
        let cfg = HarnessConfig {
            bucket_size: 7,
            ..small()
        };
        let h = RegretHarness::new(cfg, PolicyKind::default(), ReferenceKind::default()).unwrap();
        let rep = h.run().unwrap();
        let steps: Vec<u64> = rep.cumulative.iter().map(|r| r.step).collect();
        assert_eq!(steps, CheckpointSchedule::checkpoints(120));
        assert_eq!(rep.instantaneous.len(), 18);
        assert_eq!(rep.instantaneous.last().unwrap().step, 120);
        assert_eq!(rep.replications, 10);
        assert!(rep.cumulative.iter().all(|r| r.quartiles.is_none()));
    }

    #[test]
    fn regret_is_non_negative_and_non_decreasing() {
        let h = RegretHarness::new(small(), PolicyKind::default(), ReferenceKind::default())
            .unwrap();
        let rep = h.run().unwrap();
        for r in &rep.instantaneous {
            assert!(r.mean >= 0.0);
        }
        for w in rep.cumulative.windows(2) {
            assert!(w[1].mean >= w[0].mean - 1e-12);
        }
    }

    #[test]
    fn optimal_single_arm_has_zero_regret() {
        let cfg = HarnessConfig {
            arms: 1,
            ..small()
        };
        let h = RegretHarness::new(cfg, PolicyKind::default(), ReferenceSource::bernoulli(&[0.4]))
            .unwrap();
        let rep = h.run().unwrap();
        assert_eq!(rep.final_cumulative_mean(), Some(0.0));
    }

    #[test]
    fn quartiles_are_reported_when_requested() {
        let cfg = HarnessConfig {
            quartiles: true,
            ..small()
        };
        let h = RegretHarness::new(cfg, PolicyKind::default(), ReferenceKind::default()).unwrap();
        let rep = h.run().unwrap();
        let last = rep.cumulative.last().unwrap();
        let q = last.quartiles.unwrap();
        assert!(q[0] <= q[2] && q[2] <= q[4]);
    }

    #[test]
    fn beta_binomial_policy_rejects_gaussian_rewards() {
        let h = RegretHarness::new(
            small(),
            PolicyKind::default(),
            ReferenceKind::Normal { sd: 0.1 },
        )
        .unwrap();
        assert!(matches!(
            h.run(),
            Err(BanditError::InvalidObservation { .. })
        ));
    }

    #[test]
    fn batch_size_does_not_change_results() {
        let a = RegretHarness::new(small(), PolicyKind::default(), ReferenceKind::default())
            .unwrap()
            .run()
            .unwrap();
        let b = RegretHarness::new(
            HarnessConfig {
                batch_size: 1,
                ..small()
            },
            PolicyKind::default(),
            ReferenceKind::default(),
        )
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cumulative_at_looks_up_checkpoints() {
        let h = RegretHarness::new(small(), PolicyKind::default(), ReferenceKind::default())
            .unwrap();
        let rep = h.run().unwrap();
        assert!(rep.cumulative_at(1).is_some());
        assert!(rep.cumulative_at(53).is_none());
        assert_eq!(rep.cumulative_at(120), rep.final_cumulative_mean());
    }
}
