//! # streamful-server
//!
//! HTTP transport for the streaming anomaly detection pipeline: one
//! ingress route feeding the single-writer pipeline, a full-history query,
//! and two auto-reconnecting SSE feeds fanning the raw and anomaly streams
//! out to dashboards.

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use broker::Channel;
use detection::{
    AnomalyRecord, Classifier, DataPoint, PointClassifier, StreamingStats, WindowStats,
};
use ingest::IngestPipeline;
use store::AnomalyLog;

mod config;
mod routes;

use config::ServerConfig;

/// Raw points replayed to a newly attached stream subscriber.
const RAW_BACKLOG: usize = 50;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<tokio::sync::Mutex<IngestPipeline>>,
    log: Arc<AnomalyLog>,
    raw: Arc<Channel<DataPoint>>,
    anomalies: Arc<Channel<AnomalyRecord>>,
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - is the pipeline able to classify and is the log
/// reachable?
async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    // Exercise the detection crates end to end on a known spike.
    let detector_ok = (|| {
        let mut window = WindowStats::new(2).ok()?;
        let classifier = Classifier::new(2.0).ok()?;
        window.observe(10.0);
        window.observe(10.0);
        let verdict = classifier.classify(40.0, &window.stats());
        verdict.is_anomalous().then_some(())
    })()
    .is_some();

    let samples = state.pipeline.lock().await.samples();
    Json(serde_json::json!({
        "status": if detector_ok { "ready" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "window_samples": samples,
        "anomaly_log_bytes": state.log.committed(),
        "subscribers": {
            "raw": state.raw.subscriber_count().await,
            "anomalies": state.anomalies.subscriber_count().await,
        }
    }))
}

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,ingest=info,store=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let log = match AnomalyLog::open(&config.anomaly_log_file).await {
        Ok(log) => Arc::new(log),
        Err(err) => {
            tracing::error!(
                path = %config.anomaly_log_file.display(),
                error = %err,
                "cannot open anomaly log"
            );
            std::process::exit(1);
        }
    };

    // Seed the anomaly stream with persisted history so reconnecting
    // dashboards see it across server restarts.
    let anomalies = Arc::new(Channel::unbounded_backlog());
    match log.read_all().await {
        Ok(history) => {
            tracing::info!(records = history.len(), "replayed anomaly history");
            anomalies.seed(history).await;
        }
        Err(err) => {
            tracing::warn!(error = %err, "starting with empty anomaly history");
        }
    }
    let raw = Arc::new(Channel::bounded(RAW_BACKLOG));

    let pipeline =
        match IngestPipeline::new(&config.detector, log.clone(), raw.clone(), anomalies.clone()) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                tracing::error!(error = %err, "cannot build ingest pipeline");
                std::process::exit(1);
            }
        };

    // Create application state
    let state = AppState {
        pipeline: Arc::new(tokio::sync::Mutex::new(pipeline)),
        log,
        raw,
        anomalies,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with middleware
    let app = Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        // Legacy health endpoint
        .route("/health", get(liveness))
        // API endpoints
        .route("/api/v1/ingest", post(routes::ingest))
        .route("/api/v1/anomalies", get(routes::anomalies))
        .route("/api/v1/stream/data", get(routes::stream_data))
        .route("/api/v1/stream/anomalies", get(routes::stream_anomalies))
        // Middleware layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT configuration");

    tracing::info!(
        "streamful-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
