//! The ingest pipeline.

use std::sync::Arc;

use broker::Channel;
use detection::{
    AnomalyRecord, Classifier, DataPoint, DetectorConfig, PointClassifier, StreamingStats,
    Verdict, WindowStats,
};
use store::AnomalyLog;

use crate::error::{IngestError, Result};

/// Outcome of one ingested point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingested {
    /// Classification verdict for the point.
    pub verdict: Verdict,
    /// False only when an anomaly record failed to reach the log. The
    /// record was still published live.
    pub persisted: bool,
}

/// Drives one point at a time through window, classifier, log, and broker.
///
/// Callers must serialize `ingest` (the server holds the pipeline behind a
/// mutex): the window is single-writer state and no two points may be
/// classified against overlapping window snapshots.
pub struct IngestPipeline {
    window: WindowStats,
    classifier: Classifier,
    log: Arc<AnomalyLog>,
    raw: Arc<Channel<DataPoint>>,
    anomalies: Arc<Channel<AnomalyRecord>>,
}

impl IngestPipeline {
    /// Build a pipeline from a validated configuration.
    pub fn new(
        config: &DetectorConfig,
        log: Arc<AnomalyLog>,
        raw: Arc<Channel<DataPoint>>,
        anomalies: Arc<Channel<AnomalyRecord>>,
    ) -> detection::Result<Self> {
        Ok(Self {
            window: WindowStats::from_config(config)?,
            classifier: Classifier::from_config(config)?,
            log,
            raw,
            anomalies,
        })
    }

    /// Number of samples currently in the window.
    pub fn samples(&self) -> usize {
        self.window.samples()
    }

    /// Ingest one point.
    ///
    /// A rejected point leaves the window exactly as it was. A persistence
    /// failure is non-fatal: the point still counts toward statistics and
    /// the record is still broadcast live.
    pub async fn ingest(&mut self, point: DataPoint) -> Result<Ingested> {
        if !point.value.is_finite() {
            return Err(IngestError::validation("value must be a finite number"));
        }
        if !point.timestamp.is_finite() {
            return Err(IngestError::validation("timestamp must be a finite number"));
        }

        // Classify against the window as it stood before this point; a
        // spike must not pull the threshold toward itself.
        let stats = self.window.stats();
        let verdict = self.classifier.classify(point.value, &stats);
        self.window.observe(point.value);

        let mut persisted = true;
        if verdict.is_anomalous() {
            let record = AnomalyRecord::from_observation(&point, &stats);
            tracing::info!(
                value = record.value,
                mean = record.mean,
                std_dev = record.std_dev,
                "anomaly detected"
            );

            if let Err(err) = self.log.append(&record).await {
                tracing::warn!(error = %err, "anomaly record not persisted; streaming it anyway");
                persisted = false;
            }

            self.raw.publish(point).await;
            self.anomalies.publish(record).await;
        } else {
            self.raw.publish(point).await;
        }

        Ok(Ingested { verdict, persisted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pipeline_with(
        dir: &tempfile::TempDir,
        window_size: usize,
        multiplier: f64,
    ) -> (
        IngestPipeline,
        Arc<AnomalyLog>,
        Arc<Channel<DataPoint>>,
        Arc<Channel<AnomalyRecord>>,
    ) {
        let config = DetectorConfig::new(window_size, multiplier).unwrap();
        let log = Arc::new(
            AnomalyLog::open(dir.path().join("anomalies.log"))
                .await
                .unwrap(),
        );
        let raw = Arc::new(Channel::bounded(50));
        let anomalies = Arc::new(Channel::unbounded_backlog());
        let pipeline =
            IngestPipeline::new(&config, log.clone(), raw.clone(), anomalies.clone()).unwrap();
        (pipeline, log, raw, anomalies)
    }

    #[tokio::test]
    async fn test_rejects_non_finite_without_touching_window() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, _, _, _) = pipeline_with(&dir, 4, 2.0).await;

        assert!(pipeline
            .ingest(DataPoint::new(f64::NAN, 1.0))
            .await
            .is_err());
        assert!(pipeline
            .ingest(DataPoint::new(1.0, f64::INFINITY))
            .await
            .is_err());
        assert_eq!(pipeline.samples(), 0);
    }

    #[tokio::test]
    async fn test_normal_point_not_persisted_but_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, log, raw, anomalies) = pipeline_with(&dir, 4, 2.0).await;

        let result = pipeline
            .ingest(DataPoint::new(45.0, 1.0))
            .await
            .unwrap();
        assert_eq!(result.verdict, Verdict::Normal);
        assert!(result.persisted);

        assert!(log.read_all().await.unwrap().is_empty());
        assert_eq!(raw.backlog_len().await, 1);
        assert_eq!(anomalies.backlog_len().await, 0);
    }

    #[tokio::test]
    async fn test_spike_persisted_with_pre_spike_stats() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, log, _, anomalies) = pipeline_with(&dir, 3, 1.5).await;

        for t in 0..3 {
            pipeline
                .ingest(DataPoint::new(5.0, t as f64))
                .await
                .unwrap();
        }
        let result = pipeline
            .ingest(DataPoint::new(20.0, 99.5))
            .await
            .unwrap();
        assert_eq!(result.verdict, Verdict::Anomalous);
        assert!(result.persisted);

        let records = log.read_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 20.0);
        assert_eq!(records[0].timestamp, 99.5, "record carries the event timestamp");
        assert_eq!(records[0].mean, 5.0);
        assert_eq!(records[0].std_dev, 0.0);

        assert_eq!(anomalies.backlog_len().await, 1);
    }

    #[tokio::test]
    async fn test_cold_window_never_flags() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, log, _, _) = pipeline_with(&dir, 10, 2.0).await;

        let first = pipeline
            .ingest(DataPoint::new(1.0e9, 0.0))
            .await
            .unwrap();
        let second = pipeline
            .ingest(DataPoint::new(-1.0e9, 1.0))
            .await
            .unwrap();
        assert_eq!(first.verdict, Verdict::Normal);
        assert_eq!(second.verdict, Verdict::Normal);
        assert!(log.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_raw_channel_sees_every_accepted_point() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, _, raw, _) = pipeline_with(&dir, 3, 1.5).await;

        let mut sub = raw.subscribe().await;
        for t in 0..3 {
            pipeline
                .ingest(DataPoint::new(5.0, t as f64))
                .await
                .unwrap();
        }
        pipeline.ingest(DataPoint::new(20.0, 3.0)).await.unwrap();

        let mut values = Vec::new();
        for _ in 0..4 {
            values.push(sub.recv().await.unwrap().value);
        }
        assert_eq!(values, vec![5.0, 5.0, 5.0, 20.0]);
    }

    // /dev/full accepts the open but fails every write with ENOSPC.
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_persistence_failure_degrades_to_live_only() {
        let config = DetectorConfig::new(3, 1.5).unwrap();
        let log = Arc::new(AnomalyLog::open("/dev/full").await.unwrap());
        let raw = Arc::new(Channel::bounded(50));
        let anomalies = Arc::new(Channel::unbounded_backlog());
        let mut pipeline =
            IngestPipeline::new(&config, log, raw, anomalies.clone()).unwrap();

        let mut sub = anomalies.subscribe().await;

        for t in 0..3 {
            pipeline
                .ingest(DataPoint::new(5.0, t as f64))
                .await
                .unwrap();
        }

        let result = pipeline
            .ingest(DataPoint::new(20.0, 3.0))
            .await
            .unwrap();
        assert_eq!(result.verdict, Verdict::Anomalous);
        assert!(!result.persisted, "writes to /dev/full must fail");

        // The record still went out live.
        let record = sub.recv().await.unwrap();
        assert_eq!(record.value, 20.0);

        // And the window kept counting.
        assert_eq!(pipeline.samples(), 3);
    }
}
