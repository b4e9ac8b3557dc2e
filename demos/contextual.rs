//! Contextual Beta bandit over a shared feature map.
//!
//! Six arms share three features; the environment pays off according to the logistic
//! of each arm's true linear score. Prints per-arm selection counts.
//!
//! Run:
//! `cargo run --example contextual --features contextual`

use banditry::{ContextualBayesBandit, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<()> {
    let feature_map = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
    ];
    let true_theta = [-1.0, 0.5, 1.5];
    let truth: Vec<f64> = feature_map
        .iter()
        .map(|row| {
            let s: f64 = row.iter().zip(&true_theta).map(|(w, t)| w * t).sum();
            1.0 / (1.0 + (-s).exp())
        })
        .collect();

    let mut bandit = ContextualBayesBandit::new(feature_map, 7)?;
    let mut env = StdRng::seed_from_u64(8);
    let mut counts = vec![0usize; truth.len()];
    for _ in 0..5_000 {
        let arm = bandit.sample();
        counts[arm] += 1;
        bandit.train(arm, env.random::<f64>() < truth[arm])?;
    }

    println!("arm\tp_true\tpulls");
    for (arm, (p, n)) in truth.iter().zip(&counts).enumerate() {
        println!("{arm}\t{p:.3}\t{n}");
    }
    println!("feature\talpha\tbeta");
    for (j, (a, b)) in bandit.feature_state().iter().enumerate() {
        println!("{j}\t{a:.1}\t{b:.1}");
    }
    Ok(())
}
