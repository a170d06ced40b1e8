//! Load test for the log relay.
//!
//! Opens many event-stream observers, then floods `POST /log` from a set of
//! posters and reports how many relayed records each observer received.
//!
//! Usage: cargo run --bin logflood -- [OPTIONS]

use clap::Parser;
use heads_shared::protocol::{ClientLog, LogLevel};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "logflood", about = "Flood the log relay and measure fan-out delivery")]
struct FloodArgs {
    /// Number of event-stream observers
    #[arg(long, default_value_t = 50)]
    observers: u32,

    /// Number of concurrent log posters
    #[arg(long, default_value_t = 4)]
    posters: u32,

    /// Logs per second per poster
    #[arg(long, default_value_t = 20.0)]
    rate: f64,

    /// Test duration in seconds
    #[arg(long, default_value_t = 10)]
    duration: u64,

    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    url: String,
}

// === Metrics ===

struct Metrics {
    observers_connected: AtomicU64,
    records_received: AtomicU64,
    logs_sent: AtomicU64,
    post_errors: AtomicU64,
    observer_errors: AtomicU64,
    latency_sum_ms: AtomicU64,
    latency_count: AtomicU64,
}

impl Metrics {
    fn new() -> Self {
        Self {
            observers_connected: AtomicU64::new(0),
            records_received: AtomicU64::new(0),
            logs_sent: AtomicU64::new(0),
            post_errors: AtomicU64::new(0),
            observer_errors: AtomicU64::new(0),
            latency_sum_ms: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
        }
    }
}

/// Count complete SSE events carrying data, draining them from `buf`.
fn drain_events(buf: &mut String) -> u64 {
    let mut count = 0;
    while let Some(end) = buf.find("\n\n") {
        let block: String = buf.drain(..end + 2).collect();
        if block.lines().any(|line| line.starts_with("data:")) {
            count += 1;
        }
    }
    count
}

// === Observer task ===

async fn run_observer(
    observer_id: u32,
    client: reqwest::Client,
    url: String,
    duration: Duration,
    metrics: Arc<Metrics>,
) {
    let mut resp = match client.get(format!("{}/events", url)).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            if observer_id < 5 {
                eprintln!("Observer {} got status {}", observer_id, resp.status());
            }
            metrics.observer_errors.fetch_add(1, Ordering::Relaxed);
            return;
        }
        Err(e) => {
            if observer_id < 5 {
                eprintln!("Observer {} failed to connect: {}", observer_id, e);
            }
            metrics.observer_errors.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };
    metrics.observers_connected.fetch_add(1, Ordering::Relaxed);

    let deadline = tokio::time::Instant::now() + duration;
    let mut buf = String::new();
    loop {
        match tokio::time::timeout_at(deadline, resp.chunk()).await {
            Ok(Ok(Some(chunk))) => {
                buf.push_str(&String::from_utf8_lossy(&chunk));
                let n = drain_events(&mut buf);
                metrics.records_received.fetch_add(n, Ordering::Relaxed);
            }
            Ok(Ok(None)) => {
                if observer_id < 3 {
                    eprintln!("Observer {} stream ended", observer_id);
                }
                break;
            }
            Ok(Err(e)) => {
                if observer_id < 3 {
                    eprintln!("Observer {} error: {}", observer_id, e);
                }
                metrics.observer_errors.fetch_add(1, Ordering::Relaxed);
                break;
            }
            Err(_) => break, // Test over
        }
    }

    metrics.observers_connected.fetch_sub(1, Ordering::Relaxed);
}

// === Poster task ===

async fn run_poster(
    poster_id: u32,
    client: reqwest::Client,
    url: String,
    rate: f64,
    duration: Duration,
    metrics: Arc<Metrics>,
) {
    let interval = if rate > 0.0 {
        Duration::from_secs_f64(1.0 / rate)
    } else {
        Duration::from_secs(3600) // Effectively never
    };
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let test_end = Instant::now() + duration;
    let mut seq: u64 = 0;
    while Instant::now() < test_end {
        timer.tick().await;
        seq += 1;
        let log = ClientLog::new(LogLevel::Info, "logflood").with_arg(format!("{poster_id}:{seq}"));

        let start = Instant::now();
        match client.post(format!("{}/log", url)).json(&log).send().await {
            Ok(resp) if resp.status().is_success() => {
                metrics.logs_sent.fetch_add(1, Ordering::Relaxed);
                metrics
                    .latency_sum_ms
                    .fetch_add(start.elapsed().as_millis() as u64, Ordering::Relaxed);
                metrics.latency_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(resp) => {
                if poster_id < 2 {
                    eprintln!("Poster {} got status {}", poster_id, resp.status());
                }
                metrics.post_errors.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                if poster_id < 2 {
                    eprintln!("Poster {} error: {}", poster_id, e);
                }
                metrics.post_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

// === Main ===

#[tokio::main]
async fn main() {
    let FloodArgs {
        observers: num_observers,
        posters: num_posters,
        rate,
        duration: duration_secs,
        url,
    } = FloodArgs::parse();
    let url = url.trim_end_matches('/').to_string();

    println!("=== Log Relay Load Test ===");
    println!("Observers: {}", num_observers);
    println!("Posters: {} at {}/s each", num_posters, rate);
    println!("Duration: {}s", duration_secs);
    println!("URL: {}", url);
    println!();

    let client = reqwest::Client::new();
    let metrics = Arc::new(Metrics::new());
    let duration = Duration::from_secs(duration_secs);
    // Observers outlive the posters so in-flight records still arrive
    let observe_for = duration + Duration::from_secs(2);

    let mut observers = Vec::with_capacity(num_observers as usize);
    for observer_id in 0..num_observers {
        let client = client.clone();
        let url = url.clone();
        let metrics = Arc::clone(&metrics);
        observers.push(tokio::spawn(async move {
            run_observer(observer_id, client, url, observe_for, metrics).await;
        }));

        // Stagger connects slightly to avoid thundering herd
        if observer_id % 50 == 49 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    // Let observers subscribe before the first record goes out
    tokio::time::sleep(Duration::from_millis(500)).await;
    let connected = metrics.observers_connected.load(Ordering::Relaxed);
    println!("{} observers connected", connected);

    let mut posters = Vec::with_capacity(num_posters as usize);
    for poster_id in 0..num_posters {
        let client = client.clone();
        let url = url.clone();
        let metrics = Arc::clone(&metrics);
        posters.push(tokio::spawn(async move {
            run_poster(poster_id, client, url, rate, duration, metrics).await;
        }));
    }

    // Print stats periodically
    let metrics_clone = Arc::clone(&metrics);
    let stats_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(2));
        let start = Instant::now();
        loop {
            interval.tick().await;
            println!(
                "[{:3}s] observers={}, sent={}, received={}, post_errors={}, observer_errors={}",
                start.elapsed().as_secs(),
                metrics_clone.observers_connected.load(Ordering::Relaxed),
                metrics_clone.logs_sent.load(Ordering::Relaxed),
                metrics_clone.records_received.load(Ordering::Relaxed),
                metrics_clone.post_errors.load(Ordering::Relaxed),
                metrics_clone.observer_errors.load(Ordering::Relaxed),
            );
        }
    });

    for handle in posters {
        let _ = handle.await;
    }
    for handle in observers {
        let _ = handle.await;
    }
    stats_handle.abort();

    // Final stats
    let sent = metrics.logs_sent.load(Ordering::Relaxed);
    let received = metrics.records_received.load(Ordering::Relaxed);
    let post_errors = metrics.post_errors.load(Ordering::Relaxed);
    let observer_errors = metrics.observer_errors.load(Ordering::Relaxed);
    let latency_sum = metrics.latency_sum_ms.load(Ordering::Relaxed);
    let latency_count = metrics.latency_count.load(Ordering::Relaxed);

    println!();
    println!("=== Final Results ===");
    println!("Logs posted: {}", sent);
    println!("Post errors: {}", post_errors);
    println!("Observer errors: {}", observer_errors);
    println!("Records received (all observers): {}", received);
    if latency_count > 0 {
        println!("Average post latency: {}ms", latency_sum / latency_count);
    }

    let expected = sent * connected;
    if expected > 0 {
        println!(
            "Delivery rate: {:.1}% of {} expected",
            received as f64 / expected as f64 * 100.0,
            expected
        );
    }
}
