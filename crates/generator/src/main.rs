//! # streamful-generator
//!
//! Synthetic metric source: posts one `{value, timestamp}` point per
//! interval to the ingest endpoint, occasionally adding a spike so the
//! detection pipeline has something to flag.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "streamful-generator")]
#[command(about = "Synthetic metric generator", long_about = None)]
struct Args {
    /// Ingest endpoint of the detection server
    #[arg(long, default_value = "http://localhost:8001/api/v1/ingest")]
    target: String,

    /// Seconds between generated points
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Lower bound of the normal value range
    #[arg(long, default_value_t = 40.0)]
    min: f64,

    /// Upper bound of the normal value range
    #[arg(long, default_value_t = 50.0)]
    max: f64,

    /// Probability of adding a spike to a point
    #[arg(long, default_value_t = 0.1)]
    anomaly_probability: f64,

    /// Smallest spike added to an anomalous point
    #[arg(long, default_value_t = 10.0)]
    spike_min: f64,

    /// Largest spike added to an anomalous point
    #[arg(long, default_value_t = 20.0)]
    spike_max: f64,
}

fn validate(args: &Args) -> Result<(), String> {
    if !(args.min < args.max) {
        return Err(format!("min ({}) must be below max ({})", args.min, args.max));
    }
    if !(0.0..=1.0).contains(&args.anomaly_probability) {
        return Err(format!(
            "anomaly-probability ({}) must be within [0, 1]",
            args.anomaly_probability
        ));
    }
    if !(args.spike_min < args.spike_max) {
        return Err(format!(
            "spike-min ({}) must be below spike-max ({})",
            args.spike_min, args.spike_max
        ));
    }
    if !(args.interval > 0.0 && args.interval.is_finite()) {
        return Err(format!("interval ({}) must be positive", args.interval));
    }
    Ok(())
}

/// Draw the next value: uniform in the normal range, plus an occasional
/// uniform spike.
fn synthesize(args: &Args, rng: &mut impl Rng) -> f64 {
    let mut value = rng.gen_range(args.min..args.max);
    if rng.gen_bool(args.anomaly_probability) {
        value += rng.gen_range(args.spike_min..args.spike_max);
    }
    value
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generator=info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(reason) = validate(&args) {
        eprintln!("Error: {}", reason);
        std::process::exit(1);
    }

    tracing::info!(target = %args.target, interval = args.interval, "generating data points");

    let client = reqwest::Client::new();
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(args.interval));

    loop {
        ticker.tick().await;

        let value = synthesize(&args, &mut rand::thread_rng());
        let point = serde_json::json!({
            "value": value,
            "timestamp": unix_now(),
        });

        match client.post(&args.target).json(&point).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(value, "point accepted");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(%status, body, "point not accepted");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to post data point");
            }
        }
    }
}
