//! Client log intake and Server-Sent Events fan-out.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream};
use serde_json::Value;
use std::convert::Infallible;
use tokio::sync::broadcast;

use crate::routes::AppState;
use crate::scrub::relay_record;

/// Broadcast hub for relayed log records.
///
/// Observers subscribe on connect and only see records published after
/// that. Slow observers skip what they missed; closed ones simply drop
/// their receiver.
#[derive(Clone)]
pub struct LogHub {
    tx: broadcast::Sender<String>,
    depth: usize,
}

impl LogHub {
    pub fn new(capacity: usize, depth: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, depth }
    }

    /// Relay a client payload. Returns how many observers it reached.
    pub fn publish(&self, payload: &Value) -> usize {
        let record = relay_record(payload, self.depth);
        // No observers is not an error
        self.tx.send(record).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Parse a log upload. An empty body is an empty object; anything else
/// must be a JSON object or array.
pub fn parse_log_body(body: &[u8]) -> Result<Value, String> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        _ => Err("log body must be a JSON object or array".to_string()),
    }
}

/// `POST /log`
pub async fn post_log(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let payload = parse_log_body(&body).map_err(|e| {
        tracing::warn!("Rejected client log: {}", e);
        (StatusCode::BAD_REQUEST, e)
    })?;

    tracing::info!(target: "client", "CLIENT LOG: {}", payload);
    let reached = state.logs.publish(&payload);
    tracing::debug!("Relayed client log to {} observers", reached);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /events`
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.logs.subscribe();
    tracing::info!("Log observer connected ({} total)", state.logs.observer_count());

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(record) => return Some((Ok(Event::default().data(record)), rx)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Log observer lagged by {} records", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
