//! Basic example demonstrating streaming detection
//!
//! Run with: cargo run --example basic -p detection

use detection::{Classifier, DetectorConfig, PointClassifier, StreamingStats, WindowStats};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== streamful detection Basic Example ===\n");

    let config = DetectorConfig::new(10, 2.0)?;
    let mut window = WindowStats::from_config(&config)?;
    let classifier = Classifier::from_config(&config)?;

    // A steady stream with two injected spikes
    let stream = vec![
        45.0, 45.3, 44.7, 45.1, 44.9, 45.2, 44.8, 45.0, 45.1, 44.9,
        62.0, 45.0, 45.2, 44.8, 45.1, 44.9, 45.0, 58.5, 45.1, 44.9,
    ];

    println!("window_size={} multiplier={}\n", config.window_size, config.threshold_multiplier);

    for (i, &value) in stream.iter().enumerate() {
        let stats = window.stats();
        let verdict = classifier.classify(value, &stats);
        window.observe(value);

        if verdict.is_anomalous() {
            println!(
                "  point {:2}: value={:.1} ANOMALOUS (mean={:.2}, std_dev={:.2})",
                i, value, stats.mean, stats.std_dev
            );
        } else {
            println!("  point {:2}: value={:.1} normal", i, value);
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
