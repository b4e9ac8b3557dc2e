//! Ranking, horizon and commitment studies at reduced size.

use banditry::{CommitStudy, HorizonStudy, PolicyKind, RankingConfig, RankingStudy};

#[test]
fn ranking_precision_climbs_over_trials() {
    let cfg = RankingConfig {
        copies: 10,
        trials: 300,
        seed: 1,
        ..RankingConfig::default()
    };
    let rep = RankingStudy::new(cfg).unwrap().run().unwrap();
    assert_eq!(rep.rows.len(), 300);
    let window = |r: std::ops::Range<usize>| {
        let n = r.len() as f64;
        rep.rows[r].iter().map(|x| x.precision_percent).sum::<f64>() / n
    };
    let early = window(0..20);
    let late = window(280..300);
    // A random 20-item page out of 200 holds one key item in ten on average.
    assert!(early < 25.0, "early={early}");
    assert!(late > early + 20.0, "early={early} late={late}");
}

#[test]
fn ranking_is_reproducible_and_policy_sensitive() {
    let cfg = RankingConfig {
        key_items: 3,
        page_size: 5,
        total_items: 30,
        copies: 4,
        trials: 60,
        seed: 9,
        ..RankingConfig::default()
    };
    let a = RankingStudy::new(cfg).unwrap().run().unwrap();
    let b = RankingStudy::new(cfg).unwrap().run().unwrap();
    assert_eq!(a, b);
    let ng = RankingStudy::new(RankingConfig {
        policy: PolicyKind::normal_gamma(),
        ..cfg
    })
    .unwrap()
    .run()
    .unwrap();
    assert_ne!(a.rows, ng.rows);
}

#[test]
fn horizon_rows_follow_requested_horizons() {
    let rows = HorizonStudy {
        arms: 3,
        horizons: vec![20, 200],
        replications: 100,
        seed: 2,
        ..HorizonStudy::default()
    }
    .run()
    .unwrap();
    let steps: Vec<u64> = rows.iter().map(|r| r.steps).collect();
    assert_eq!(steps, vec![20, 200]);
    for r in &rows {
        assert!(r.quartiles[4] <= 1.0 && r.quartiles[0] >= -1.0);
        assert!(r.median() >= r.quartiles[1] && r.median() <= r.quartiles[3]);
    }
}

#[test]
fn commitment_grows_with_the_gap() {
    let base = CommitStudy {
        steps: 600,
        cutoff: 400,
        replications: 60,
        seed: 4,
        ..CommitStudy::default()
    };
    let close = CommitStudy {
        probabilities: [0.5, 0.52],
        ..base
    }
    .run()
    .unwrap();
    let far = CommitStudy {
        probabilities: [0.2, 0.8],
        ..base
    }
    .run()
    .unwrap();
    assert!(far > close, "far={far} close={close}");
    assert!(far > 0.98);
}
