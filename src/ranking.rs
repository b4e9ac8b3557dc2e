//! Ranking study: Thompson sampling as a page-ranking policy.
//!
//! `total_items` items have fixed click probabilities, sorted so item 0 is the best.
//! On every trial, each of `copies` independent policies shows a page of its
//! `page_size` top-ranked items, observes one Bernoulli click per shown item, and
//! trains on all of them.
//!
//! Per trial, averaged over copies:
//! - precision: fraction of the `key_items` best items that made it onto the page
//! - regret: `sum_j (prob[j] - prob[page[j]])`, i.e. the best possible page's true
//!   click mass minus the shown page's, position by position

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::{stream_seed, BanditError, BanditPolicy, PolicyKind, Result};

/// Sizing for a [`RankingStudy`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankingConfig {
    /// Items counted as relevant for precision (the best `key_items`).
    pub key_items: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// Independent policies averaged per trial.
    pub copies: usize,
    pub trials: usize,
    pub seed: u64,
    pub policy: PolicyKind,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            key_items: 10,
            page_size: 20,
            total_items: 200,
            copies: 50,
            trials: 1_000,
            seed: 0,
            policy: PolicyKind::default(),
        }
    }
}

/// One output row per trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankingRow {
    /// One-based trial number.
    pub trial: usize,
    pub precision_percent: f64,
    pub regret: f64,
    pub cumulative_regret: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankingReport {
    pub rows: Vec<RankingRow>,
    /// Mean per-item observation count across copies, indexed by true rank.
    pub sample_counts: Vec<f64>,
}

impl RankingReport {
    pub fn final_precision_percent(&self) -> Option<f64> {
        self.rows.last().map(|r| r.precision_percent)
    }

    pub fn final_cumulative_regret(&self) -> Option<f64> {
        self.rows.last().map(|r| r.cumulative_regret)
    }
}

/// Per-copy raw output.
struct CopyTrace {
    hits: Vec<usize>,
    regret: Vec<f64>,
    sample_counts: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct RankingStudy {
    config: RankingConfig,
}

impl RankingStudy {
    pub fn new(config: RankingConfig) -> Result<Self> {
        let c = &config;
        if c.total_items == 0 || c.copies == 0 || c.trials == 0 {
            return Err(BanditError::invalid_argument(
                "ranking study needs items, copies and trials",
            ));
        }
        if c.key_items == 0 || c.key_items > c.total_items {
            return Err(BanditError::invalid_argument(format!(
                "key_items must be in 1..={}, got {}",
                c.total_items, c.key_items
            )));
        }
        if c.page_size > c.total_items {
            return Err(BanditError::invalid_argument(format!(
                "page_size {} exceeds {} items",
                c.page_size, c.total_items
            )));
        }
        config.policy.build(c.total_items, 0)?;
        Ok(Self { config })
    }

    /// True click probabilities, descending.
    pub fn probabilities(&self) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(stream_seed(self.config.seed, "ranking-prob", 0));
        let mut p: Vec<f64> = (0..self.config.total_items)
            .map(|_| rng.random::<f64>())
            .collect();
        p.sort_by(f64::total_cmp);
        p.iter().map(|x| 1.0 - x).collect()
    }

    pub fn run(&self) -> Result<RankingReport> {
        let c = &self.config;
        debug!(
            policy = c.policy.name(),
            key_items = c.key_items,
            page_size = c.page_size,
            total_items = c.total_items,
            copies = c.copies,
            trials = c.trials,
            "ranking study starting"
        );
        let prob = self.probabilities();
        let copies = self.run_copies(&prob)?;

        let mut rows = Vec::with_capacity(c.trials);
        let mut cumulative = 0.0;
        for t in 0..c.trials {
            let hits: usize = copies.iter().map(|cp| cp.hits[t]).sum();
            let regret = copies.iter().map(|cp| cp.regret[t]).sum::<f64>() / c.copies as f64;
            cumulative += regret;
            rows.push(RankingRow {
                trial: t + 1,
                precision_percent: 100.0 * hits as f64 / (c.key_items * c.copies) as f64,
                regret,
                cumulative_regret: cumulative,
            });
        }

        let mut sample_counts = vec![0.0; c.total_items];
        for cp in &copies {
            for (acc, n) in sample_counts.iter_mut().zip(&cp.sample_counts) {
                *acc += n / c.copies as f64;
            }
        }

        let report = RankingReport {
            rows,
            sample_counts,
        };
        info!(
            precision_percent = report.final_precision_percent().unwrap_or(f64::NAN),
            cumulative_regret = report.final_cumulative_regret().unwrap_or(f64::NAN),
            "ranking study complete"
        );
        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn run_copies(&self, prob: &[f64]) -> Result<Vec<CopyTrace>> {
        use rayon::prelude::*;
        (0..self.config.copies)
            .into_par_iter()
            .map(|m| self.run_copy(m as u64, prob))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_copies(&self, prob: &[f64]) -> Result<Vec<CopyTrace>> {
        (0..self.config.copies)
            .map(|m| self.run_copy(m as u64, prob))
            .collect()
    }

    fn run_copy(&self, m: u64, prob: &[f64]) -> Result<CopyTrace> {
        let c = &self.config;
        let mut policy = c
            .policy
            .build(c.total_items, stream_seed(c.seed, "ranking-policy", m))?;
        let mut rng = StdRng::seed_from_u64(stream_seed(c.seed, "ranking-click", m));
        let mut hits = Vec::with_capacity(c.trials);
        let mut regret = Vec::with_capacity(c.trials);
        for _ in 0..c.trials {
            let page = policy.rank(c.page_size)?;
            hits.push(page.iter().filter(|&&item| item < c.key_items).count());
            regret.push(
                page.iter()
                    .enumerate()
                    .map(|(j, &k)| prob[j] - prob[k])
                    .sum(),
            );
            for &k in &page {
                let click = if rng.random::<f64>() < prob[k] { 1.0 } else { 0.0 };
                policy.train(k, click)?;
            }
        }
        trace!(copy = m, "ranking copy finished");
        Ok(CopyTrace {
            hits,
            regret,
            sample_counts: policy.sample_counts(),
        })
    }
}
