//! Trace a few Metropolis walks over Beta(alpha, beta) as TSV.
//!
//! Run:
//! `cargo run --example beta_walk`

use banditry::{BetaWalk, Result, StreamingSummarizer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    let (alpha, beta, step_size) = (1.0, 40.0, 0.1);
    let walks = 30;
    let steps = 2_000;

    let mut rng = StdRng::seed_from_u64(1);
    let mut summary = StreamingSummarizer::with_quartiles();
    println!("walk\tstep\tp");
    for w in 0..walks {
        let mut walk = BetaWalk::new(alpha, beta, step_size, &mut rng)?;
        for i in 0..steps {
            let p = walk.step(&mut rng);
            summary.add(p);
            if i % 10 == 0 {
                println!("{w}\t{i}\t{p:.5}");
            }
        }
    }
    eprintln!(
        "mean={:.4} (target {:.4}) median={:.4}",
        summary.mean(),
        alpha / (alpha + beta),
        summary.median().unwrap_or(f64::NAN)
    );
    Ok(())
}
