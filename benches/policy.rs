use banditry::{BanditPolicy, EpsilonGreedy, ThompsonSampling};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn trained_thompson(k: usize, gaussian: bool) -> ThompsonSampling {
    let mut ts = if gaussian {
        ThompsonSampling::normal_gamma(k, 1).unwrap()
    } else {
        ThompsonSampling::beta_binomial(k, 1).unwrap()
    };
    // A deterministic reward pattern so every arm has a few observations.
    for i in 0..(20 * k) {
        let arm = i % k;
        let r = if gaussian {
            (arm as f64) / k as f64
        } else if i % 3 == 0 {
            1.0
        } else {
            0.0
        };
        ts.train(arm, r).unwrap();
    }
    ts
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    for &k in &[2usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("thompson/beta", k), &k, |b, &k| {
            let mut ts = trained_thompson(k, false);
            b.iter(|| black_box(ts.select()))
        });
        group.bench_with_input(BenchmarkId::new("thompson/normal_gamma", k), &k, |b, &k| {
            let mut ts = trained_thompson(k, true);
            b.iter(|| black_box(ts.select()))
        });
        group.bench_with_input(BenchmarkId::new("epsilon_greedy", k), &k, |b, &k| {
            let mut eg = EpsilonGreedy::new(k, 0.1, 1).unwrap();
            b.iter(|| black_box(eg.select()))
        });
    }
    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for &(k, top) in &[(200usize, 20usize), (1_000, 50)] {
        group.bench_with_input(
            BenchmarkId::new("thompson/beta", format!("{k}x{top}")),
            &(k, top),
            |b, &(k, top)| {
                let mut ts = trained_thompson(k, false);
                b.iter(|| black_box(ts.rank(top).unwrap()))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_select, bench_rank);
criterion_main!(benches);
