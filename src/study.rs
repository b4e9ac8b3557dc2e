//! Small fixed-shape studies built on the policies.
//!
//! - [`HorizonStudy`]: how far a policy's win rate falls short of the best arm's
//!   probability, as a function of the horizon.
//! - [`CommitStudy`]: how often a policy has settled on the better of two arms after a
//!   warm-up period.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::{stream_seed, BanditError, BanditPolicy, PolicyKind, Result, StreamingSummarizer};

/// Win-rate shortfall summary for one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizonRow {
    pub steps: u64,
    pub mean: f64,
    /// `[min, q1, median, q3, max]` of `wins / steps - p_best`.
    pub quartiles: [f64; 5],
}

impl HorizonRow {
    pub fn median(&self) -> f64 {
        self.quartiles[2]
    }
}

/// Replicated win-rate study over several horizons.
///
/// Each replication draws `arms` uniform probabilities, plays a fresh policy for
/// `steps` rounds and records `wins / steps - max(p)`. The value is at most slightly
/// positive (lucky streaks) and approaches zero as the policy commits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizonStudy {
    pub arms: usize,
    pub horizons: Vec<u64>,
    pub replications: usize,
    pub policy: PolicyKind,
    pub seed: u64,
}

impl Default for HorizonStudy {
    fn default() -> Self {
        Self {
            arms: 2,
            horizons: vec![10, 20, 50, 100, 200, 500, 1_000, 2_000],
            replications: 1_000,
            policy: PolicyKind::default(),
            seed: 0,
        }
    }
}

impl HorizonStudy {
    pub fn run(&self) -> Result<Vec<HorizonRow>> {
        if self.arms == 0 || self.replications == 0 {
            return Err(BanditError::invalid_argument(
                "horizon study needs arms and replications",
            ));
        }
        if self.horizons.contains(&0) {
            return Err(BanditError::invalid_argument("horizons must be positive"));
        }
        debug!(arms = self.arms, horizons = ?self.horizons, "horizon study starting");

        let mut rows = Vec::with_capacity(self.horizons.len());
        for (h, &n) in self.horizons.iter().enumerate() {
            let mut summary = StreamingSummarizer::with_quartiles();
            let mut rng = StdRng::seed_from_u64(stream_seed(self.seed, "horizon", h as u64));
            for j in 0..self.replications {
                let mut p: Vec<f64> = (0..self.arms).map(|_| rng.random::<f64>()).collect();
                p.sort_by(f64::total_cmp);
                let best = p[self.arms - 1];
                let stream = (h * self.replications + j) as u64;
                let mut policy = self
                    .policy
                    .build(self.arms, stream_seed(self.seed, "horizon-policy", stream))?;
                let mut wins = 0u64;
                for _ in 0..n {
                    let k = policy.select();
                    let won = rng.random::<f64>() <= p[k];
                    wins += won as u64;
                    policy.train(k, if won { 1.0 } else { 0.0 })?;
                }
                summary.add(wins as f64 / n as f64 - best);
            }
            let quartiles = summary.quartiles().unwrap_or([f64::NAN; 5]);
            rows.push(HorizonRow {
                steps: n,
                mean: summary.mean(),
                quartiles,
            });
        }
        info!(
            final_median = rows.last().map(HorizonRow::median).unwrap_or(f64::NAN),
            "horizon study complete"
        );
        Ok(rows)
    }
}

/// Two-arm commitment study.
///
/// Counts, over `replications` runs of `steps` rounds, the fraction of rounds after
/// `cutoff` on which the arm with the higher probability was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitStudy {
    pub probabilities: [f64; 2],
    pub steps: u64,
    /// Rounds with zero-based index `<= cutoff` are not counted.
    pub cutoff: u64,
    pub replications: usize,
    pub policy: PolicyKind,
    pub seed: u64,
}

impl Default for CommitStudy {
    fn default() -> Self {
        Self {
            probabilities: [0.1, 0.12],
            steps: 3_000,
            cutoff: 2_000,
            replications: 1_000,
            policy: PolicyKind::default(),
            seed: 0,
        }
    }
}

impl CommitStudy {
    /// Fraction of counted rounds that chose the better arm.
    pub fn run(&self) -> Result<f64> {
        let [a, b] = self.probabilities;
        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) {
            return Err(BanditError::invalid_argument(format!(
                "probabilities must be in [0, 1], got {a} and {b}"
            )));
        }
        let no_rounds_counted = self
            .cutoff
            .checked_add(1)
            .map_or(true, |c| self.steps <= c);
        if self.replications == 0 || no_rounds_counted {
            return Err(BanditError::invalid_argument(
                "commit study needs replications and rounds after the cutoff",
            ));
        }
        let p = if a <= b { [a, b] } else { [b, a] };
        debug!(
            p0 = p[0],
            p1 = p[1],
            steps = self.steps,
            cutoff = self.cutoff,
            "commit study starting"
        );

        let mut rng = StdRng::seed_from_u64(stream_seed(self.seed, "commit", 0));
        let mut counted = 0u64;
        let mut correct = 0u64;
        for j in 0..self.replications {
            let mut policy = self
                .policy
                .build(2, stream_seed(self.seed, "commit-policy", j as u64))?;
            for i in 0..self.steps {
                let k = policy.select();
                if i > self.cutoff {
                    counted += 1;
                    correct += (k == 1) as u64;
                }
                let won = rng.random::<f64>() <= p[k];
                policy.train(k, if won { 1.0 } else { 0.0 })?;
            }
        }
        let fraction = correct as f64 / counted as f64;
        info!(fraction, "commit study complete");
        Ok(fraction)
    }
}
