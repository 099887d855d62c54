//! API route handlers

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use broker::Subscription;
use detection::DataPoint;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// One inbound metric submission.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub value: f64,
    pub timestamp: f64,
}

/// Accept a data point, classify it, and acknowledge synchronously.
///
/// `persisted: false` in an accepted response means the anomaly record
/// could not be written to the log but was still streamed live.
pub async fn ingest(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> impl IntoResponse {
    let point = DataPoint::new(req.value, req.timestamp);

    let mut pipeline = state.pipeline.lock().await;
    match pipeline.ingest(point).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "accepted",
                "verdict": outcome.verdict,
                "persisted": outcome.persisted,
            })),
        ),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "status": "rejected",
                "reason": err.to_string(),
            })),
        ),
    }
}

/// Full anomaly history as a JSON array, in append order.
pub async fn anomalies(State(state): State<AppState>) -> impl IntoResponse {
    match state.log.read_all().await {
        Ok(records) => (StatusCode::OK, Json(serde_json::json!(records))),
        Err(err) => {
            tracing::error!(error = %err, "failed to read anomaly log");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "failed to read anomaly log" })),
            )
        }
    }
}

/// Live raw stream: the most recent points as a backlog burst, then every
/// accepted point as it arrives.
///
/// On transport error the feed just ends; clients reconnect (default
/// backoff: 60 seconds) and replay the backlog again.
pub async fn stream_data(State(state): State<AppState>) -> impl IntoResponse {
    let sub = state.raw.subscribe().await;
    tracing::info!("raw stream subscriber attached");
    sse_feed(sub)
}

/// Live anomaly stream: all stored anomalies as a backlog burst, then new
/// records as they are detected.
pub async fn stream_anomalies(State(state): State<AppState>) -> impl IntoResponse {
    let sub = state.anomalies.subscribe().await;
    tracing::info!("anomaly stream subscriber attached");
    sse_feed(sub)
}

/// Replay the subscription's backlog, then follow its live feed until the
/// client disconnects (which drops the whole stream, and with it the
/// subscription) or the channel closes.
fn sse_feed<T>(mut sub: Subscription<T>) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Serialize + Clone + Send + 'static,
{
    let stream = async_stream::stream! {
        for item in sub.take_backlog() {
            match Event::default().json_data(&item) {
                Ok(event) => yield Ok(event),
                Err(err) => tracing::error!(error = %err, "failed to encode event"),
            }
        }
        while let Some(item) = sub.recv().await {
            match Event::default().json_data(&item) {
                Ok(event) => yield Ok(event),
                Err(err) => tracing::error!(error = %err, "failed to encode event"),
            }
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_request_parses_wire_format() {
        let req: IngestRequest =
            serde_json::from_str(r#"{"value": 45.5, "timestamp": 1700000000.25}"#).unwrap();
        assert_eq!(req.value, 45.5);
        assert_eq!(req.timestamp, 1700000000.25);
    }

    #[test]
    fn test_ingest_request_rejects_missing_fields() {
        assert!(serde_json::from_str::<IngestRequest>(r#"{"value": 45.5}"#).is_err());
        assert!(serde_json::from_str::<IngestRequest>(r#"{"timestamp": 1.0}"#).is_err());
    }
}
