//! Forward panics to the server log before the default hook runs.

use std::panic::PanicHookInfo;

use heads_shared::protocol::{CrashReport, LOG_PATH};

fn crash_report(info: &PanicHookInfo<'_>) -> CrashReport {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string());
    let location = info.location();
    CrashReport {
        message,
        filename: location.map(|l| l.file().to_string()),
        lineno: location.map(|l| l.line()),
        colno: location.map(|l| l.column()),
        stack: Some(std::backtrace::Backtrace::force_capture().to_string()),
    }
}

/// Install a panic hook that uploads a [`CrashReport`] and then hands over
/// to whatever hook was installed before.
pub fn install_panic_forwarder(base_url: &str) {
    let url = format!("{}{}", base_url.trim_end_matches('/'), LOG_PATH);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let report = crash_report(info);
        deliver(&url, report);
        previous(info);
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn deliver(url: &str, report: CrashReport) {
    use std::time::Duration;

    // The panicking thread may be inside an async runtime, where blocking
    // requests are not allowed, so post from a fresh thread and wait.
    let url = url.to_string();
    let sender = std::thread::spawn(move || {
        let Ok(client) = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return;
        };
        let _ = client.post(&url).json(&report).send();
    });
    let _ = sender.join();
}

#[cfg(target_arch = "wasm32")]
fn deliver(url: &str, report: CrashReport) {
    let url = url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        let _ = reqwest::Client::new().post(&url).json(&report).send().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn report_carries_message_and_location() {
        let captured: Arc<Mutex<Option<CrashReport>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&captured);
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(crash_report(info));
            }
        }));
        let _ = std::panic::catch_unwind(|| panic!("head exploded: {}", 7));
        std::panic::set_hook(previous);

        let report = captured.lock().unwrap().take().expect("hook should run");
        assert_eq!(report.message, "head exploded: 7");
        assert!(report.filename.unwrap().ends_with("panic.rs"));
        assert!(report.lineno.is_some());
    }
}
