mod constants;
mod game;
mod net;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::PresentMode;

use constants::{ASSET_ROOT, DEFAULT_SERVER_URL};
use game::{CorePlugin, HeadsPlugin, HoverPlugin, InputPlugin, ModePlugin, PlayerPlugin};
use net::{forward_log_layer, install_panic_forwarder, NetworkPlugin};

fn main() {
    let server_url = server_url_from_env_or_location();
    install_panic_forwarder(&server_url);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Talking Heads".to_string(),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: ASSET_ROOT.to_string(),
                    ..default()
                })
                .set(LogPlugin {
                    custom_layer: forward_log_layer,
                    ..default()
                }),
        )
        .add_plugins(CorePlugin { server_url })
        .add_plugins(InputPlugin)
        .add_plugins(PlayerPlugin)
        .add_plugins(ModePlugin)
        .add_plugins(HeadsPlugin)
        .add_plugins(HoverPlugin)
        .add_plugins(NetworkPlugin)
        .run();
}

#[cfg(not(target_arch = "wasm32"))]
fn server_url_from_env_or_location() -> String {
    std::env::var("HEADS_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

/// The page is served by the same server that hosts the API.
#[cfg(target_arch = "wasm32")]
fn server_url_from_env_or_location() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| !origin.is_empty() && origin != "null")
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}
