//! Directory listings for the image and audio assets under the public root.

use axum::extract::State;
use axum::Json;
use heads_shared::protocol::AssetList;
use std::path::Path;

use crate::routes::AppState;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];
const WALKING_LOOP: &str = "walking.mp3";

/// Lowercased extension of a file name, if it has one.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Sorted names of the regular files in `dir`. Unreadable dirs are empty.
fn file_names(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

/// Images in `<public>/images` as `/images/<file>`.
pub fn list_images(public_dir: &Path) -> AssetList {
    file_names(&public_dir.join("images"))
        .into_iter()
        .filter(|name| {
            extension_of(name)
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false)
        })
        .map(|name| format!("/images/{name}"))
        .collect()
}

/// Background music in `<public>` and `<public>/music`, without the
/// walking loop.
pub fn list_audio(public_dir: &Path) -> AssetList {
    let roots = [(public_dir.to_path_buf(), "/"), (public_dir.join("music"), "/music/")];
    let mut out: AssetList = Vec::new();
    for (dir, prefix) in roots {
        for name in file_names(&dir) {
            if extension_of(&name).as_deref() != Some("mp3") {
                continue;
            }
            if name.eq_ignore_ascii_case(WALKING_LOOP) {
                continue;
            }
            let rel = format!("{prefix}{name}");
            if !out.contains(&rel) {
                out.push(rel);
            }
        }
    }
    out
}

pub async fn images_handler(State(state): State<AppState>) -> Json<AssetList> {
    let dir = state.config.public_dir.clone();
    let list = tokio::task::spawn_blocking(move || list_images(&dir))
        .await
        .unwrap_or_default();
    Json(list)
}

pub async fn audio_handler(State(state): State<AppState>) -> Json<AssetList> {
    let dir = state.config.public_dir.clone();
    let list = tokio::task::spawn_blocking(move || list_audio(&dir))
        .await
        .unwrap_or_default();
    Json(list)
}
