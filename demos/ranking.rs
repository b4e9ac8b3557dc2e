//! Ranking study as CSV: per-trial precision and regret, then samples per true rank.
//!
//! Run:
//! `cargo run --release --example ranking -- [key_items] [page_size] [total_items] [beta|gamma]`

use banditry::{PolicyKind, RankingConfig, RankingStudy};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = RankingConfig::default();
    if let Some(a) = args.first() {
        config.key_items = a.parse()?;
    }
    if let Some(a) = args.get(1) {
        config.page_size = a.parse()?;
    }
    if let Some(a) = args.get(2) {
        config.total_items = a.parse()?;
    }
    if let Some(a) = args.get(3) {
        config.policy = if a.starts_with("beta") {
            PolicyKind::default()
        } else if a.starts_with("gamma") {
            PolicyKind::normal_gamma()
        } else {
            return Err(format!("wanted beta or gamma, got {a}").into());
        };
    }

    let report = RankingStudy::new(config)?.run()?;

    println!("Trials,Precision,Regret,CumulativeRegret");
    for row in &report.rows {
        println!(
            "{},{:.1},{:.3},{:.3}",
            row.trial, row.precision_percent, row.regret, row.cumulative_regret
        );
    }
    println!();
    println!("Rank,Samples");
    for (rank, n) in report.sample_counts.iter().enumerate() {
        println!("{rank},{n:.1}");
    }
    Ok(())
}
