/// Vertical field of view of the first-person camera (degrees).
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Side length of the square ground plane.
pub const GROUND_SIZE: f32 = 1000.0;

/// Moon placement and size.
pub const MOON_POSITION: [f32; 3] = [-60.0, 80.0, -100.0];
pub const MOON_RADIUS: f32 = 8.0;

/// Texels with alpha below this are discarded on head billboards.
pub const HEAD_ALPHA_CUTOFF: f32 = 0.05;

/// Root the asset server loads from.
#[cfg(not(target_arch = "wasm32"))]
pub const ASSET_ROOT: &str = "public";
#[cfg(target_arch = "wasm32")]
pub const ASSET_ROOT: &str = ".";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const GROUND: u32 = 0x1a1a1a;
    pub const MOON: u32 = 0xf4f1c9;
    pub const HUD_TEXT: u32 = 0xffffff;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

/// Asset-server path for a server URL path, e.g. `/images/a.png` -> `images/a.png`.
pub fn asset_path(url_path: &str) -> &str {
    url_path.trim_start_matches('/')
}
