use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Image list endpoint (`GET`, JSON array of paths).
pub const IMAGES_PATH: &str = "/assets/images";
/// Audio list endpoint (`GET`, JSON array of paths).
pub const AUDIO_PATH: &str = "/assets/audio";
/// Log upload endpoint (`POST`, any JSON value).
pub const LOG_PATH: &str = "/log";
/// Server-Sent Events stream of relayed logs.
pub const EVENTS_PATH: &str = "/events";

/// Origin tag for logs uploaded by clients.
pub const FROM_CLIENT: &str = "client";

/// Heads used when the server has no image list to offer.
pub const FALLBACK_IMAGES: [&str; 9] = [
    "/images/Banks.png",
    "/images/Brez.png",
    "/images/Doge.png",
    "/images/Elon.png",
    "/images/Fatass.png",
    "/images/Ross.png",
    "/images/TJR.png",
    "/images/Tate.png",
    "/images/Trump.png",
];

/// Asset listing response body.
pub type AssetList = Vec<String>;

/// The image list to load: the server's, or the fallback when it is empty.
pub fn images_or_fallback(list: AssetList) -> AssetList {
    if list.is_empty() {
        FALLBACK_IMAGES.iter().map(|s| s.to_string()).collect()
    } else {
        list
    }
}

// === Client -> Server ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Log,
}

/// A console-style log line forwarded by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientLog {
    pub level: LogLevel,
    pub args: Vec<Value>,
}

impl ClientLog {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            args: vec![Value::String(message.into())],
        }
    }

    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// An uncaught failure on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashReport {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

// === Server -> Observers ===

/// One relayed log record as sent on the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEnvelope {
    pub from: String,
    pub payload: Value,
}

impl LogEnvelope {
    pub fn client(payload: Value) -> Self {
        Self {
            from: FROM_CLIENT.to_string(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_log_wire_shape() {
        let log = ClientLog::new(LogLevel::Warn, "Failed to load image").with_arg("/images/x.png");
        let v = serde_json::to_value(&log).unwrap();
        assert_eq!(
            v,
            json!({"level": "warn", "args": ["Failed to load image", "/images/x.png"]})
        );
    }

    #[test]
    fn crash_report_omits_missing_fields() {
        let report = CrashReport {
            message: "boom".into(),
            filename: Some("src/main.rs".into()),
            lineno: Some(12),
            colno: None,
            stack: None,
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(
            v,
            json!({"message": "boom", "filename": "src/main.rs", "lineno": 12})
        );
        let back: CrashReport = serde_json::from_value(json!({"message": "x"})).unwrap();
        assert_eq!(back.filename, None);
    }

    #[test]
    fn envelope_is_tagged_from_client() {
        let env = LogEnvelope::client(json!({"a": 1}));
        let s = serde_json::to_string(&env).unwrap();
        assert_eq!(s, r#"{"from":"client","payload":{"a":1}}"#);
    }

    #[test]
    fn empty_image_list_falls_back() {
        let list = images_or_fallback(Vec::new());
        assert_eq!(list.len(), 9);
        assert!(list.iter().all(|p| p.starts_with("/images/") && p.ends_with(".png")));

        let served = vec!["/images/a.webp".to_string()];
        assert_eq!(images_or_fallback(served.clone()), served);
    }
}
