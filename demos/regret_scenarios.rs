//! Regret curves for the standard scenarios, as TSV on stdout.
//!
//! One block per scenario: cumulative regret at each checkpoint, then mean
//! instantaneous regret per step.
//!
//! Run:
//! `RUST_LOG=banditry=info cargo run --release --example regret_scenarios`

use banditry::{HarnessConfig, PolicyKind, ReferenceKind, RegretHarness, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let scenarios = [
        (
            "beta-2",
            2,
            PolicyKind::default(),
            ReferenceKind::default(),
        ),
        (
            "beta-10",
            10,
            PolicyKind::default(),
            ReferenceKind::default(),
        ),
        (
            "gamma-10",
            10,
            PolicyKind::normal_gamma(),
            ReferenceKind::Normal { sd: 1.0 },
        ),
        (
            "egreedy-10",
            10,
            PolicyKind::EpsilonGreedy { epsilon: 0.1 },
            ReferenceKind::default(),
        ),
    ];

    for (name, arms, policy, references) in scenarios {
        let config = HarnessConfig {
            arms,
            max_steps: 10_000,
            replications: 200,
            seed: 1,
            ..HarnessConfig::default()
        };
        let report = RegretHarness::new(config, policy, references)?.run()?;

        println!("# {name} cumulative");
        println!("step\tregret");
        for row in &report.cumulative {
            println!("{}\t{:.4}", row.step, row.mean);
        }
        println!("# {name} instantaneous");
        println!("step\tregret");
        for row in &report.instantaneous {
            println!("{}\t{:.5}", row.step, row.mean);
        }
    }
    Ok(())
}
