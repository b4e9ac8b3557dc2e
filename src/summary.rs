//! Online mean / quartile accumulator.
//!
//! [`StreamingSummarizer`] answers mean, variance, min/max and (optionally) quartile
//! queries over an unbounded stream in constant memory:
//!
//! - mean / variance: Welford's recurrence.
//! - quartiles: the P² estimator (Jain & Chlamtac, 1985) with five markers at the
//!   0, 25, 50, 75 and 100 percent points. Markers are exact until five values have
//!   been seen; afterwards the interior markers are nudged toward their desired
//!   positions with piecewise-parabolic interpolation.

const QUARTILE_STEPS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, PartialEq)]
struct P2Quartiles {
    /// Values seen before the markers are initialised (at most 5).
    warmup: Vec<f64>,
    heights: [f64; 5],
    positions: [f64; 5],
    desired: [f64; 5],
}

impl P2Quartiles {
    fn new() -> Self {
        Self {
            warmup: Vec::with_capacity(5),
            heights: [0.0; 5],
            positions: [1.0, 2.0, 3.0, 4.0, 5.0],
            desired: [1.0, 2.0, 3.0, 4.0, 5.0],
        }
    }

    fn add(&mut self, x: f64) {
        if self.warmup.len() < 5 {
            self.warmup.push(x);
            if self.warmup.len() == 5 {
                let mut init = self.warmup.clone();
                init.sort_by(f64::total_cmp);
                self.heights.copy_from_slice(&init);
            }
            return;
        }

        let q = &mut self.heights;
        let k = if x < q[0] {
            q[0] = x;
            0
        } else if x >= q[4] {
            q[4] = x;
            3
        } else {
            (0..4).rfind(|&i| q[i] <= x).unwrap_or(0)
        };

        for p in &mut self.positions[k + 1..] {
            *p += 1.0;
        }
        for (d, step) in self.desired.iter_mut().zip(QUARTILE_STEPS) {
            *d += step;
        }

        for i in 1..4 {
            let d = self.desired[i] - self.positions[i];
            let n = &self.positions;
            if (d >= 1.0 && n[i + 1] - n[i] > 1.0) || (d <= -1.0 && n[i - 1] - n[i] < -1.0) {
                let s = d.signum();
                let qp = self.parabolic(i, s);
                let q = &self.heights;
                self.heights[i] = if q[i - 1] < qp && qp < q[i + 1] {
                    qp
                } else {
                    self.linear(i, s)
                };
                self.positions[i] += s;
            }
        }
    }

    fn parabolic(&self, i: usize, d: f64) -> f64 {
        let q = &self.heights;
        let n = &self.positions;
        q[i] + d / (n[i + 1] - n[i - 1])
            * ((n[i] - n[i - 1] + d) * (q[i + 1] - q[i]) / (n[i + 1] - n[i])
                + (n[i + 1] - n[i] - d) * (q[i] - q[i - 1]) / (n[i] - n[i - 1]))
    }

    fn linear(&self, i: usize, d: f64) -> f64 {
        let j = if d > 0.0 { i + 1 } else { i - 1 };
        let q = &self.heights;
        let n = &self.positions;
        q[i] + d * (q[j] - q[i]) / (n[j] - n[i])
    }

    fn quartile(&self, k: usize) -> Option<f64> {
        if self.warmup.is_empty() {
            return None;
        }
        if self.warmup.len() < 5 {
            let mut xs = self.warmup.clone();
            xs.sort_by(f64::total_cmp);
            let pos = QUARTILE_STEPS[k] * (xs.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            return Some(xs[lo] + frac * (xs[hi] - xs[lo]));
        }
        Some(self.heights[k])
    }
}

/// Bounded-memory accumulator of scalar observations.
///
/// Adding is the only mutator; all queries reflect every value added so far.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingSummarizer {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    quartiles: Option<P2Quartiles>,
}

impl Default for StreamingSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingSummarizer {
    /// Mean / variance / extrema only.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            quartiles: None,
        }
    }

    /// Also track quartile estimates.
    pub fn with_quartiles() -> Self {
        Self {
            quartiles: Some(P2Quartiles::new()),
            ..Self::new()
        }
    }

    pub fn tracks_quartiles(&self) -> bool {
        self.quartiles.is_some()
    }

    pub fn add(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
        if let Some(q) = self.quartiles.as_mut() {
            q.add(x);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all values added (`0.0` when empty).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance (`0.0` with fewer than two values).
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Quartile `k` in `0..=4` (min, q1, median, q3, max).
    ///
    /// `None` if quartiles are not tracked, nothing has been added, or `k > 4`.
    pub fn quartile(&self, k: usize) -> Option<f64> {
        if k > 4 {
            return None;
        }
        self.quartiles.as_ref()?.quartile(k)
    }

    pub fn median(&self) -> Option<f64> {
        self.quartile(2)
    }

    /// All five quartiles, when tracked and non-empty.
    pub fn quartiles(&self) -> Option<[f64; 5]> {
        let mut out = [0.0; 5];
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.quartile(k)?;
        }
        Some(out)
    }
}
