//! Mirror client log events to the server's `/log` relay.
//!
//! A tracing layer installed through `LogPlugin::custom_layer` turns events
//! into [`ClientLog`] records and queues them; a system drains the queue into
//! the [`ServerLink`] once per frame.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use bevy::log::tracing::field::{Field, Visit};
use bevy::log::tracing::{Event, Level, Metadata, Subscriber};
use bevy::log::tracing_subscriber::layer::{Context, Layer};
use bevy::log::BoxedLayer;
use bevy::prelude::*;
use heads_shared::protocol::{ClientLog, LogLevel};
use serde_json::{Map, Value};

use super::ServerLink;

/// Events from this crate are forwarded at every level, others only on error.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Records captured by [`ClientLogLayer`], waiting for the next frame.
#[derive(Resource)]
pub struct ForwardedLogs(Mutex<Receiver<ClientLog>>);

struct ClientLogLayer {
    tx: Sender<ClientLog>,
}

/// `LogPlugin::custom_layer` hook.
pub fn forward_log_layer(app: &mut App) -> Option<BoxedLayer> {
    let (tx, rx) = mpsc::channel();
    app.insert_resource(ForwardedLogs(Mutex::new(rx)));
    Some(Box::new(ClientLogLayer { tx }))
}

fn should_forward(meta: &Metadata<'_>) -> bool {
    *meta.level() == Level::ERROR
        || meta.target() == OWN_TARGET
        || meta
            .target()
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn log_level(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        _ => LogLevel::Log,
    }
}

/// Collects the `message` field and every other field as JSON.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{value:?}")));
    }
}

/// `{level, args}` for one event: the message first, then the remaining
/// fields plus the target as one object.
fn client_log(event: &Event<'_>) -> ClientLog {
    let meta = event.metadata();
    let mut collector = FieldCollector::default();
    event.record(&mut collector);

    let mut fields = collector.fields;
    fields.insert("target".to_string(), Value::from(meta.target()));
    ClientLog::new(log_level(meta.level()), collector.message.unwrap_or_default())
        .with_arg(Value::Object(fields))
}

impl<S: Subscriber> Layer<S> for ClientLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if should_forward(event.metadata()) {
            let _ = self.tx.send(client_log(event));
        }
    }
}

pub(super) fn forward_logs_system(queue: Option<Res<ForwardedLogs>>, link: Res<ServerLink>) {
    let Some(queue) = queue else {
        return;
    };
    let Ok(rx) = queue.0.lock() else {
        return;
    };
    while let Ok(log) = rx.try_recv() {
        link.send_log(&log);
    }
}
