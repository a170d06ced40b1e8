use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use bevy::prelude::Resource;
use heads_shared::protocol::{AssetList, ClientLog, IMAGES_PATH, LOG_PATH};
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum NetEvent {
    ImageList(AssetList),
    ImageListFailed(String),
}

#[cfg(not(target_arch = "wasm32"))]
type NativeCmdSender = tokio::sync::mpsc::UnboundedSender<Value>;

/// Link to the asset/log server.
///
/// On creation the image list is requested once; the answer arrives as a
/// [`NetEvent`]. Log uploads are fire-and-forget.
#[derive(Resource)]
pub struct ServerLink {
    base_url: String,
    event_rx: Mutex<Receiver<NetEvent>>,

    #[cfg(not(target_arch = "wasm32"))]
    cmd_tx: Option<NativeCmdSender>,
}

impl ServerLink {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let (event_tx, event_rx) = mpsc::channel::<NetEvent>();

        #[cfg(not(target_arch = "wasm32"))]
        let cmd_tx = spawn_native_network_thread(base_url.clone(), event_tx);

        #[cfg(target_arch = "wasm32")]
        spawn_wasm_image_request(base_url.clone(), event_tx);

        Self {
            base_url,
            event_rx: Mutex::new(event_rx),
            #[cfg(not(target_arch = "wasm32"))]
            cmd_tx,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn poll_events(&self) -> Vec<NetEvent> {
        let mut out = Vec::new();
        if let Ok(rx) = self.event_rx.lock() {
            while let Ok(evt) = rx.try_recv() {
                out.push(evt);
            }
        }
        out
    }

    pub fn send_log(&self, log: &ClientLog) {
        match serde_json::to_value(log) {
            Ok(value) => self.send(value),
            Err(e) => bevy::log::warn!("Cannot encode client log: {}", e),
        }
    }

    fn send(&self, payload: Value) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(tx) = &self.cmd_tx {
                let _ = tx.send(payload);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let url = format!("{}{}", self.base_url, LOG_PATH);
            wasm_bindgen_futures::spawn_local(async move {
                let _ = post_log(&reqwest::Client::new(), &url, &payload).await;
            });
        }
    }

    /// A link with no network behind it, fed through the returned sender.
    #[cfg(test)]
    pub fn test_stub_with_sender() -> (Self, Sender<NetEvent>) {
        let (event_tx, event_rx) = mpsc::channel::<NetEvent>();
        let link = Self {
            base_url: "http://test.invalid".to_string(),
            event_rx: Mutex::new(event_rx),
            #[cfg(not(target_arch = "wasm32"))]
            cmd_tx: None,
        };
        (link, event_tx)
    }

    /// Like [`Self::test_stub_with_sender`], also returning the receiving end
    /// of the log upload channel.
    #[cfg(all(test, not(target_arch = "wasm32")))]
    pub fn test_stub_with_channels() -> (
        Self,
        Sender<NetEvent>,
        tokio::sync::mpsc::UnboundedReceiver<Value>,
    ) {
        let (mut link, event_tx) = Self::test_stub_with_sender();
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel::<Value>();
        link.cmd_tx = Some(cmd_tx);
        (link, event_tx, cmd_rx)
    }
}

async fn fetch_image_list(client: &reqwest::Client, base_url: &str) -> Result<AssetList, String> {
    let url = format!("{}{}", base_url, IMAGES_PATH);
    let resp = client.get(&url).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("{} answered {}", url, resp.status()));
    }
    resp.json::<AssetList>().await.map_err(|e| e.to_string())
}

async fn post_log(client: &reqwest::Client, url: &str, payload: &Value) -> Result<(), String> {
    client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn image_list_event(result: Result<AssetList, String>) -> NetEvent {
    match result {
        Ok(list) => NetEvent::ImageList(list),
        Err(e) => NetEvent::ImageListFailed(e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_native_network_thread(
    base_url: String,
    event_tx: Sender<NetEvent>,
) -> Option<NativeCmdSender> {
    let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<Value>();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_io()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let _ = event_tx.send(NetEvent::ImageListFailed(format!(
                "failed to build network runtime: {e}"
            )));
            return None;
        }
    };

    std::thread::spawn(move || {
        rt.block_on(async move {
            let client = reqwest::Client::new();

            let list = fetch_image_list(&client, &base_url).await;
            let _ = event_tx.send(image_list_event(list));

            let log_url = format!("{}{}", base_url, LOG_PATH);
            while let Some(payload) = cmd_rx.recv().await {
                let client = client.clone();
                let url = log_url.clone();
                tokio::spawn(async move {
                    let _ = post_log(&client, &url, &payload).await;
                });
            }
        });
    });

    Some(cmd_tx)
}

#[cfg(target_arch = "wasm32")]
fn spawn_wasm_image_request(base_url: String, event_tx: Sender<NetEvent>) {
    wasm_bindgen_futures::spawn_local(async move {
        let client = reqwest::Client::new();
        let list = fetch_image_list(&client, &base_url).await;
        let _ = event_tx.send(image_list_event(list));
    });
}
