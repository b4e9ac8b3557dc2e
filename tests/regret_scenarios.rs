//! End-to-end regret scenarios through `RegretHarness`.

use banditry::{
    HarnessConfig, PolicyKind, ReferenceKind, ReferenceSource, RegretHarness, RegretReport,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn two_arm_config(seed: u64) -> HarnessConfig {
    HarnessConfig {
        arms: 2,
        max_steps: 1_000,
        replications: 100,
        seed,
        ..HarnessConfig::default()
    }
}

fn run(cfg: HarnessConfig, policy: PolicyKind, refs: impl Into<ReferenceSource>) -> RegretReport {
    RegretHarness::new(cfg, policy, refs).unwrap().run().unwrap()
}

#[test]
fn thompson_beats_uniform_random_on_two_arms() {
    init_tracing();
    let refs = ReferenceSource::bernoulli(&[0.3, 0.7]);

    let ts = run(two_arm_config(42), PolicyKind::default(), refs.clone());
    let uniform = run(two_arm_config(42), PolicyKind::uniform_random(), refs);

    let ts_regret = ts.cumulative_at(1_000).unwrap();
    let uniform_regret = uniform.cumulative_at(1_000).unwrap();

    assert!(ts_regret >= 0.0);
    // Uniform play loses half the gap on average: 0.5 * 1000 * 0.4.
    assert!((uniform_regret - 200.0).abs() < 10.0, "uniform={uniform_regret}");
    assert!(ts_regret < uniform_regret, "ts={ts_regret} uniform={uniform_regret}");
    // Thompson sampling's regret on a 0.4 gap is a few dozen at most.
    assert!(ts_regret < 40.0, "ts={ts_regret}");
}

#[test]
fn instantaneous_regret_decays_for_thompson() {
    let rep = run(
        two_arm_config(3),
        PolicyKind::default(),
        ReferenceSource::bernoulli(&[0.3, 0.7]),
    );
    let early: f64 = rep.instantaneous[..20].iter().map(|r| r.mean).sum::<f64>() / 20.0;
    let late: f64 = rep.instantaneous[980..].iter().map(|r| r.mean).sum::<f64>() / 20.0;
    assert!(late < early / 4.0, "early={early} late={late}");
}

#[test]
fn same_seed_same_report_different_seed_different_report() {
    let a = run(two_arm_config(9), PolicyKind::default(), ReferenceKind::default());
    let b = run(two_arm_config(9), PolicyKind::default(), ReferenceKind::default());
    let c = run(two_arm_config(10), PolicyKind::default(), ReferenceKind::default());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn batching_does_not_change_the_result() {
    let base = run(two_arm_config(5), PolicyKind::default(), ReferenceKind::default());
    for batch_size in [1, 7, 100, 1_000] {
        let cfg = HarnessConfig {
            batch_size,
            ..two_arm_config(5)
        };
        assert_eq!(run(cfg, PolicyKind::default(), ReferenceKind::default()), base);
    }
}

#[test]
fn normal_gamma_learns_gaussian_arms() {
    let cfg = HarnessConfig {
        arms: 5,
        max_steps: 2_000,
        replications: 40,
        seed: 1,
        ..HarnessConfig::default()
    };
    let refs = ReferenceKind::Normal { sd: 0.1 };
    let ng = run(cfg, PolicyKind::normal_gamma(), refs);
    let uniform = run(cfg, PolicyKind::uniform_random(), refs);
    let ng_final = ng.final_cumulative_mean().unwrap();
    let uniform_final = uniform.final_cumulative_mean().unwrap();
    assert!(ng_final >= 0.0);
    assert!(ng_final < uniform_final / 4.0, "ng={ng_final} uniform={uniform_final}");
}

#[test]
fn epsilon_greedy_sits_between_thompson_and_uniform() {
    let refs = ReferenceSource::bernoulli(&[0.3, 0.7]);
    let eg = run(
        two_arm_config(8),
        PolicyKind::EpsilonGreedy { epsilon: 0.1 },
        refs.clone(),
    );
    let uniform = run(two_arm_config(8), PolicyKind::uniform_random(), refs);
    let eg_final = eg.final_cumulative_mean().unwrap();
    // Forced exploration alone costs about 0.1 * 0.5 * 0.4 per step.
    assert!(eg_final > 10.0, "eg={eg_final}");
    assert!(eg_final < uniform.final_cumulative_mean().unwrap());
}

#[test]
fn beta_walk_references_run_to_completion() {
    let cfg = HarnessConfig {
        arms: 4,
        max_steps: 500,
        replications: 20,
        quartiles: true,
        seed: 12,
        ..HarnessConfig::default()
    };
    let rep = run(
        cfg,
        PolicyKind::default(),
        ReferenceKind::BetaWalk {
            alpha: 2.0,
            beta: 5.0,
            step_size: 0.3,
        },
    );
    assert_eq!(rep.cumulative.last().unwrap().step, 500);
    let q = rep.cumulative.last().unwrap().quartiles.unwrap();
    assert!(q[0] >= 0.0);
    assert!(q[0] <= q[2] && q[2] <= q[4]);
}
