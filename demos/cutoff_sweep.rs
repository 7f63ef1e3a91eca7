//! Example: score a small validation set and search for the best confidence cutoff.
//!
//! Run with `RUST_LOG=debug` to see the per-cutoff pass summaries.

use det_score::adapt::RecordBuilder;
use det_score::config::ScoringConfig;
use det_score::evaluator::Evaluator;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Cutoff Sweep Example ===\n");

    // Raw detector output at half resolution: targets yxyx, predictions xywh, unsorted.
    let builder = RecordBuilder::competition();
    let records = vec![
        builder.build(
            &[[10.0, 10.0, 60.0, 60.0], [200.0, 150.0, 260.0, 230.0]],
            &[
                [150.0, 200.0, 80.0, 60.0],
                [11.0, 10.0, 50.0, 50.0],
                [400.0, 400.0, 30.0, 30.0],
            ],
            &[0.45, 0.92, 0.28],
        )?,
        builder.build(
            &[[300.0, 300.0, 340.0, 360.0]],
            &[[300.0, 300.0, 60.0, 40.0], [50.0, 50.0, 20.0, 20.0]],
            &[0.81, 0.33],
        )?,
        builder.build(&[], &[[100.0, 100.0, 10.0, 10.0]], &[0.22])?,
    ];

    let evaluator = Evaluator::new(ScoringConfig::default())?;

    println!("1. Score at a fixed cutoff");
    let score = evaluator.score_dataset(&records, 0.3)?;
    println!("   cutoff {:.2} -> score {:.4}", score.cutoff, score.score);
    println!("   {}", score.stats.summary_string());
    println!();

    println!("2. Sweep the default cutoff range");
    let search = evaluator.search(&records)?;
    println!("   Cutoff | Score");
    println!("   -------|-------");
    for (cutoff, score) in &search.curve {
        println!("   {:>6.2} | {:.4}", cutoff, score);
    }
    println!();
    println!(
        "   Best score {:.4} at cutoff {:.2}",
        search.best_score, search.best_cutoff
    );

    Ok(())
}
