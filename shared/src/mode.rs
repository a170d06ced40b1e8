//! Global scene mode.
//!
//! Crazy mode is a single value read by every per-head update. Toggling it
//! never touches the heads themselves, so leaving crazy mode hands each head
//! back the spin state it had before.

use rand::Rng;

/// Background colour outside crazy mode.
pub const BASE_SKY: u32 = 0x0a0a0a;

/// Colours the sky cycles through in crazy mode.
pub const CRAZY_PALETTE: [u32; 8] = [
    0xff0080, // hot pink
    0x00ff80, // bright green
    0x8000ff, // purple
    0xff8000, // orange
    0x0080ff, // bright blue
    0xffff00, // yellow
    0xff0040, // red-pink
    0x40ff00, // lime
];

/// Seconds between sky colour changes.
pub const SKY_CYCLE_INTERVAL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    #[default]
    Normal,
    Crazy,
}

impl SceneMode {
    pub fn is_crazy(self) -> bool {
        self == SceneMode::Crazy
    }

    pub fn toggled(self) -> Self {
        match self {
            SceneMode::Normal => SceneMode::Crazy,
            SceneMode::Crazy => SceneMode::Normal,
        }
    }
}

/// Mode plus the sky colour cycling that depends on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeState {
    mode: SceneMode,
    sky_timer: f64,
    sky_index: Option<usize>,
}

impl ModeState {
    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn is_crazy(&self) -> bool {
        self.mode.is_crazy()
    }

    /// Flip the mode. Leaving crazy mode restores the base sky.
    pub fn toggle(&mut self) -> SceneMode {
        self.mode = self.mode.toggled();
        if !self.mode.is_crazy() {
            self.sky_timer = 0.0;
            self.sky_index = None;
        }
        self.mode
    }

    /// Advance sky cycling. Returns true if the sky colour changed.
    pub fn advance(&mut self, dt: f64, rng: &mut impl Rng) -> bool {
        if !self.mode.is_crazy() {
            return false;
        }
        self.sky_timer += dt;
        if self.sky_timer >= SKY_CYCLE_INTERVAL {
            self.sky_timer = 0.0;
            self.sky_index = Some(rng.gen_range(0..CRAZY_PALETTE.len()));
            return true;
        }
        false
    }

    /// Current sky colour as 0xRRGGBB.
    pub fn sky_color(&self) -> u32 {
        match self.sky_index {
            Some(i) if self.mode.is_crazy() => CRAZY_PALETTE[i],
            _ => BASE_SKY,
        }
    }

    /// HUD text describing the mode and how to change it.
    pub fn label(&self) -> &'static str {
        if self.is_crazy() {
            "Crazy Mode: ENABLED\nPress P to disable"
        } else {
            "Crazy Mode: DISABLED\nPress P to activate"
        }
    }
}
