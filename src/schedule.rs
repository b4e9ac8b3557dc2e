//! Adaptive checkpoint spacing for regret curves.
//!
//! Regret changes fastest early in a run, so checkpoints start dense and thin out:
//! the spacing starts at 1 and advances through the decimal 1-2-5 progression
//! (1, 2, 5, 10, 20, 50, ...) each time the step index exceeds `50 × spacing`.
//! The number of checkpoints for a horizon `T` is `O(log T)`.

/// Checkpoints per spacing level before the spacing is bumped.
pub const CHECKPOINTS_PER_LEVEL: u64 = 50;

/// Next value in the 1-2-5 progression after `spacing`.
///
/// Values that are not themselves 1, 2 or 5 times a power of ten advance to the next
/// power-of-ten boundary (e.g. 3 → 10).
pub fn bump(spacing: u64) -> u64 {
    let mut lead = spacing.max(1);
    let mut scale = 1u64;
    while lead >= 10 {
        lead /= 10;
        scale = scale.saturating_mul(10);
    }
    let next: u64 = match lead {
        1 => 2,
        2 => 5,
        _ => 10,
    };
    next.saturating_mul(scale)
}

/// Stateful checkpoint schedule for one replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointSchedule {
    spacing: u64,
}

impl Default for CheckpointSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointSchedule {
    pub fn new() -> Self {
        Self { spacing: 1 }
    }

    pub fn spacing(&self) -> u64 {
        self.spacing
    }

    /// Advance to zero-based step `step`; returns true when the cumulative total after
    /// this step (i.e. at step number `step + 1`) should be recorded.
    ///
    /// Must be called once per step, in order.
    pub fn advance(&mut self, step: u64) -> bool {
        if step > CHECKPOINTS_PER_LEVEL.saturating_mul(self.spacing) {
            self.spacing = bump(self.spacing);
        }
        (step + 1) % self.spacing == 0
    }

    /// All one-based checkpoint step numbers for a run of `max_steps`.
    pub fn checkpoints(max_steps: u64) -> Vec<u64> {
        let mut s = Self::new();
        (0..max_steps)
            .filter(|&i| s.advance(i))
            .map(|i| i + 1)
            .collect()
    }
}
