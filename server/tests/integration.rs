//! Integration tests for the heads server.
//!
//! These tests start a real server instance on an ephemeral port and talk
//! to it over HTTP to verify end-to-end behavior.

use heads_server::config::ServerConfig;
use heads_server::routes::{build_router, AppState};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

const TEST_MAX_LOG_BYTES: usize = 1024;

/// Start a test server serving `public_dir` and return its base URL.
async fn start_test_server(public_dir: &Path) -> String {
    let config = ServerConfig {
        listen: "127.0.0.1".to_string(),
        port: 0,
        public_dir: public_dir.to_path_buf(),
        max_log_bytes: TEST_MAX_LOG_BYTES,
        ..Default::default()
    };
    config.validate().unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(AppState::new(config));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A public dir with a couple of images, music and an index page.
fn sample_public_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("images")).unwrap();
    fs::create_dir(root.join("music")).unwrap();
    fs::write(root.join("index.html"), "<html>heads</html>").unwrap();
    fs::write(root.join("images/Doge.png"), b"png").unwrap();
    fs::write(root.join("images/Ross.webp"), b"webp").unwrap();
    fs::write(root.join("images/readme.md"), b"md").unwrap();
    fs::write(root.join("walking.mp3"), b"mp3").unwrap();
    fs::write(root.join("theme.mp3"), b"mp3").unwrap();
    fs::write(root.join("music/track.mp3"), b"mp3").unwrap();
    dir
}

/// Open the event stream. The observer is subscribed once headers arrive.
async fn open_events(base: &str) -> reqwest::Response {
    let resp = reqwest::get(format!("{}/events", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");
    resp
}

/// Read the next `data:` event from an SSE response.
async fn next_event(resp: &mut reqwest::Response, buf: &mut String) -> Option<String> {
    loop {
        if let Some(end) = buf.find("\n\n") {
            let block: String = buf.drain(..end + 2).collect();
            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|line| line.trim_start())
                .collect();
            if !data.is_empty() {
                return Some(data.join("\n"));
            }
            // Comment or keep-alive block
            continue;
        }
        let chunk = resp.chunk().await.ok()??;
        buf.push_str(&String::from_utf8_lossy(&chunk));
    }
}

async fn next_event_timeout(resp: &mut reqwest::Response, buf: &mut String) -> Option<Value> {
    let data = tokio::time::timeout(Duration::from_secs(2), next_event(resp, buf))
        .await
        .ok()??;
    Some(serde_json::from_str(&data).expect("event data should be JSON"))
}

async fn post_log(base: &str, body: impl Into<reqwest::Body>) -> StatusCode {
    reqwest::Client::new()
        .post(format!("{}/log", base))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
        .status()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_image_listing() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let list: Vec<String> = reqwest::get(format!("{}/assets/images", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, vec!["/images/Doge.png", "/images/Ross.webp"]);
}

#[tokio::test]
async fn test_image_listing_without_images_dir_is_empty() {
    let public = tempfile::tempdir().unwrap();
    let base = start_test_server(public.path()).await;

    let resp = reqwest::get(format!("{}/assets/images", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<String> = resp.json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_audio_listing_excludes_walking_loop() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let list: Vec<String> = reqwest::get(format!("{}/assets/audio", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, vec!["/theme.mp3", "/music/track.mp3"]);
}

#[tokio::test]
async fn test_static_files_and_index() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let index = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(index.text().await.unwrap(), "<html>heads</html>");

    let image = reqwest::get(format!("{}/images/Doge.png", base)).await.unwrap();
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.bytes().await.unwrap().as_ref(), b"png");

    let missing = reqwest::get(format!("{}/images/Nobody.png", base)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/assets/images", base))
        .header("origin", "http://example.test")
        .send()
        .await
        .unwrap();
    let allow = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow, Some("*"));
}

#[tokio::test]
async fn test_log_without_observers_is_accepted() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let status = post_log(&base, r#"{"level":"info","args":["hello"]}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_log_reaches_event_observer() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let mut events = open_events(&base).await;
    let mut buf = String::new();

    let body = json!({"level": "warn", "args": ["Failed to load image", "/images/x.png"]});
    assert_eq!(post_log(&base, body.to_string()).await, StatusCode::NO_CONTENT);

    let record = next_event_timeout(&mut events, &mut buf)
        .await
        .expect("observer should receive the log");
    assert_eq!(record, json!({"from": "client", "payload": body}));
}

#[tokio::test]
async fn test_deep_payload_is_scrubbed() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let mut events = open_events(&base).await;
    let mut buf = String::new();

    let body = json!({"a": {"b": {"c": {"d": 1}}}, "list": [[1], 2]});
    assert_eq!(post_log(&base, body.to_string()).await, StatusCode::NO_CONTENT);

    let record = next_event_timeout(&mut events, &mut buf).await.unwrap();
    assert_eq!(
        record["payload"],
        json!({"a": {"b": "[Object]"}, "list": ["[Array]", 2]})
    );
}

#[tokio::test]
async fn test_every_observer_gets_each_log_in_order() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let mut first = open_events(&base).await;
    let mut second = open_events(&base).await;
    let (mut buf1, mut buf2) = (String::new(), String::new());

    for i in 0..3 {
        assert_eq!(
            post_log(&base, json!({ "n": i }).to_string()).await,
            StatusCode::NO_CONTENT
        );
    }

    for i in 0..3 {
        let a = next_event_timeout(&mut first, &mut buf1).await.unwrap();
        let b = next_event_timeout(&mut second, &mut buf2).await.unwrap();
        assert_eq!(a["payload"]["n"], i);
        assert_eq!(b["payload"]["n"], i);
    }
}

#[tokio::test]
async fn test_late_observer_gets_no_backlog() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    post_log(&base, json!({"before": true}).to_string()).await;

    let mut events = open_events(&base).await;
    let mut buf = String::new();
    post_log(&base, json!({"after": true}).to_string()).await;

    let record = next_event_timeout(&mut events, &mut buf).await.unwrap();
    assert_eq!(record["payload"], json!({"after": true}));
}

#[tokio::test]
async fn test_empty_log_body_relays_empty_object() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let mut events = open_events(&base).await;
    let mut buf = String::new();
    assert_eq!(post_log(&base, "").await, StatusCode::NO_CONTENT);

    let record = next_event_timeout(&mut events, &mut buf).await.unwrap();
    assert_eq!(record, json!({"from": "client", "payload": {}}));
}

#[tokio::test]
async fn test_malformed_log_is_rejected() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    assert_eq!(post_log(&base, "{oops").await, StatusCode::BAD_REQUEST);
    assert_eq!(post_log(&base, "17").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_log_is_rejected() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let mut events = open_events(&base).await;
    let mut buf = String::new();

    let big = json!({"blob": "x".repeat(TEST_MAX_LOG_BYTES * 2)});
    assert_eq!(
        post_log(&base, big.to_string()).await,
        StatusCode::PAYLOAD_TOO_LARGE
    );

    // Nothing was relayed for the rejected upload
    post_log(&base, json!({"ok": 1}).to_string()).await;
    let record = next_event_timeout(&mut events, &mut buf).await.unwrap();
    assert_eq!(record["payload"], json!({"ok": 1}));
}

#[tokio::test]
async fn test_closed_observer_does_not_block_relay() {
    let public = sample_public_dir();
    let base = start_test_server(public.path()).await;

    let gone = open_events(&base).await;
    let mut kept = open_events(&base).await;
    let mut buf = String::new();
    drop(gone);
    tokio::time::sleep(Duration::from_millis(50)).await;

    for i in 0..5 {
        assert_eq!(
            post_log(&base, json!({ "n": i }).to_string()).await,
            StatusCode::NO_CONTENT
        );
    }
    for i in 0..5 {
        let record = next_event_timeout(&mut kept, &mut buf).await.unwrap();
        assert_eq!(record["payload"]["n"], i);
    }
}
